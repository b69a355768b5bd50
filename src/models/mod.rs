pub mod number;
pub mod operator;
pub mod outcome;

pub use number::{collect_lines, collect_numbers, display_form, normalize, CanonicalNumber};
pub use operator::{classify, Classification, OperatorEntry, OperatorLabel, OPERATORS};
pub use outcome::{export_rows, render_tsv, BatchSummary, LookupOutcome, Resolution};
