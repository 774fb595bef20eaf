pub mod aggregation;
pub mod enrichment;
pub mod quality_checker;

pub use aggregation::{
    count_by_group, group_fold, mean_by_group, Aggregation, GroupQuery, MeanAggregation,
    RangeFilter,
};
pub use enrichment::Enricher;
pub use quality_checker::{DataQualityWarning, QualityChecker, QualityReport, WarningKind};
