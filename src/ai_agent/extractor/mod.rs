pub mod metric_extractor;
