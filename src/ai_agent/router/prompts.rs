use crate::ai_agent::router::category::AnalysisCategory;

pub const COMPANY_PLACEHOLDER: &str = "company_name";
pub const QUERY_PLACEHOLDER: &str = "query";

const BUSINESS_MODEL: &str = r#"Explain the business model of {company_name}.
Describe its main revenue streams, customer segments, value proposition, and cost structure.
Summarize in 4-5 bullet points."#;

const MANAGEMENT_COMMENTARY: &str = r#"Summarize the recent management commentary for {company_name}.
Highlight key themes such as business outlook, challenges, opportunities, and strategic decisions.
Keep it concise and actionable."#;

const RED_FLAGS: &str = r#"Identify and explain potential red flags for {company_name}.
Include points such as:
- Governance or regulatory issues
- Declining margins or rising debt
- Frequent leadership changes
- Auditor resignations or lawsuits
Provide a short summary."#;

const KEY_PRODUCTS: &str = r#"Create a summary of key products or services offered by {company_name}.
Include product/service names, segments, and growth trends."#;

const EVOLUTION: &str = r#"Describe the evolution of {company_name} over the last 3 years.
Cover:
- Business expansion or restructuring
- Financial performance trends
- New product launches
- Mergers, acquisitions, or partnerships
Present it as a concise 3-year timeline."#;

const STOCK_PERFORMANCE: &str = r#"Based on recent financial data and management commentary, analyze how the stock of {company_name} is expected to perform in the next 6-12 months.
Include technical and fundamental insights where possible.
Summarize risks and catalysts."#;

const GROWTH_OUTLOOK: &str = r#"Project the growth outlook for {company_name} over the next 3 years.
Include potential drivers (sector growth, policy, expansion) and risks.
Summarize with key metrics like Revenue CAGR and ROE trends."#;

const GUIDANCE_VS_DELIVERY: &str = r#"Analyze management's past guidance vs actual delivery for {company_name}.
Highlight whether management has been consistent or overpromising."#;

const GENERAL: &str = r#"Using the available documents for {company_name}, answer the following question:
{query}

Ground every statement in those documents and say so explicitly when they do not contain the answer."#;

/// Appended to the fallback prompt when the session holds an uploaded document.
pub const DOCUMENT_SECTION_HEADER: &str = "\n\nDocument excerpt:\n";

pub fn template_for(category: AnalysisCategory) -> &'static str {
  match category {
    AnalysisCategory::BusinessModel => BUSINESS_MODEL,
    AnalysisCategory::ManagementCommentary => MANAGEMENT_COMMENTARY,
    AnalysisCategory::RedFlags => RED_FLAGS,
    AnalysisCategory::KeyProducts => KEY_PRODUCTS,
    AnalysisCategory::Evolution => EVOLUTION,
    AnalysisCategory::StockPerformance => STOCK_PERFORMANCE,
    AnalysisCategory::GrowthOutlook => GROWTH_OUTLOOK,
    AnalysisCategory::GuidanceVsDelivery => GUIDANCE_VS_DELIVERY,
    AnalysisCategory::General => GENERAL,
  }
}

/// Replaces `{name}` placeholders in a single left-to-right pass, so
/// substituted values are never themselves scanned for placeholders.
/// Unknown `{...}` sequences are copied through untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
  let mut output = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(open) = rest.find('{') {
    output.push_str(&rest[..open]);
    let after = &rest[open + 1..];
    let replacement = values.iter().find_map(|(key, value)| {
      after.strip_prefix(*key).and_then(|tail| tail.strip_prefix('}')).map(|tail| (*value, tail))
    });

    match replacement {
      Some((value, tail)) => {
        output.push_str(value);
        rest = tail;
      }
      None => {
        output.push('{');
        rest = after;
      }
    }
  }
  output.push_str(rest);
  return output;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_template_mentions_the_company() {
    for category in AnalysisCategory::ALL {
      assert!(template_for(category).contains("{company_name}"), "{} lacks company placeholder", category);
    }
  }

  #[test]
  fn only_general_takes_the_query() {
    for category in AnalysisCategory::ALL {
      assert_eq!(template_for(category).contains("{query}"), category.is_fallback());
    }
  }

  #[test]
  fn fill_is_single_pass() {
    let filled = fill_template("{company_name}: {query}", &[(COMPANY_PLACEHOLDER, "{query}"), (QUERY_PLACEHOLDER, "why?")]);
    assert_eq!(filled, "{query}: why?");
  }

  #[test]
  fn unknown_braces_are_kept() {
    let filled = fill_template("{\"a\": 1} {company_name} {", &[(COMPANY_PLACEHOLDER, "Acme")]);
    assert_eq!(filled, "{\"a\": 1} Acme {");
  }
}
