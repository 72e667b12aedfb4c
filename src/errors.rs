use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid business profile:\n  - {}", .0.join("\n  - "))] Profile(Vec<String>),
    #[error("unsupported file format: {0}")] Format(String),
    #[error("provider error: {0}")] Provider(String),
    #[error("no content to export; generate a content plan first")] EmptyExport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_error_lists_every_problem() {
        let err = PlanError::Profile(vec!["a is required".into(), "b is required".into()]);
        let msg = err.to_string();
        assert!(msg.contains("a is required"));
        assert!(msg.contains("\n  - b is required"));
    }
}
