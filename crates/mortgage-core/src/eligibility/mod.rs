pub mod amortization;
pub mod evaluator;
pub mod rules;
