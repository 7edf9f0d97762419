
use crate::ai_agent::router::category::AnalysisCategory;
use crate::ai_agent::router::prompts::{fill_template, template_for, COMPANY_PLACEHOLDER, DOCUMENT_SECTION_HEADER, QUERY_PLACEHOLDER};

/// A keyword predicate over an already lower-cased query.
#[derive(Debug, Clone, Copy)]
pub enum KeywordRule {
  Contains(&'static str),
  AllOf(&'static [&'static str]),
  AnyOf(&'static [&'static str]),
}

impl KeywordRule {
  pub fn matches(&self, query_lower: &str) -> bool {
    match self {
      KeywordRule::Contains(keyword) => query_lower.contains(keyword),
      KeywordRule::AllOf(keywords) => keywords.iter().all(|k| query_lower.contains(k)),
      KeywordRule::AnyOf(keywords) => keywords.iter().any(|k| query_lower.contains(k)),
    }
  }
}

/// Evaluated top to bottom; the first matching rule decides the category.
pub const ROUTING_RULES: [(KeywordRule, AnalysisCategory); 8] = [
  (KeywordRule::Contains("business model"), AnalysisCategory::BusinessModel),
  (KeywordRule::AllOf(&["management", "commentary"]), AnalysisCategory::ManagementCommentary),
  (KeywordRule::Contains("red flag"), AnalysisCategory::RedFlags),
  (KeywordRule::AnyOf(&["product", "service"]), AnalysisCategory::KeyProducts),
  (KeywordRule::Contains("evolution"), AnalysisCategory::Evolution),
  (KeywordRule::AnyOf(&["stock", "performance"]), AnalysisCategory::StockPerformance),
  (KeywordRule::AnyOf(&["growth", "outlook"]), AnalysisCategory::GrowthOutlook),
  (KeywordRule::Contains("guidance"), AnalysisCategory::GuidanceVsDelivery),
];

pub fn classify(query: &str) -> AnalysisCategory {
  let query_lower: String = query.to_lowercase();
  ROUTING_RULES.iter()
    .find(|(rule, _)| rule.matches(&query_lower))
    .map(|(_, category)| *category)
    .unwrap_or(AnalysisCategory::General)
}

pub fn render(category: AnalysisCategory, company_name: &str, query: &str) -> String {
  fill_template(template_for(category), &[(COMPANY_PLACEHOLDER, company_name), (QUERY_PLACEHOLDER, query)])
}

/// Like `render`, but embeds document text under a fallback prompt.
/// Non-fallback categories ignore the document.
pub fn render_with_document(category: AnalysisCategory, company_name: &str, query: &str, document: Option<&str>) -> String {
  let mut prompt: String = render(category, company_name, query);
  if let (true, Some(text)) = (category.is_fallback(), document) {
    prompt.push_str(DOCUMENT_SECTION_HEADER);
    prompt.push_str(text);
  }
  return prompt;
}

/// One user submission, classified on construction.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
  pub company_name: String,
  pub query: String,
  pub category: AnalysisCategory,
}

impl AnalysisRequest {
  pub fn new(company_name: &str, query: &str) -> Self {
    AnalysisRequest { company_name: company_name.to_string(), query: query.to_string(), category: classify(query) }
  }

  pub fn into_prompt(self, document: Option<&str>) -> String {
    render_with_document(self.category, &self.company_name, &self.query, document)
  }
}
