use crate::config::Settings;
use crate::error::FindTextError;
use log::debug;

/// Checks the run's preconditions in order, stopping at the first failure:
/// the input PDF exists, the terms file exists, and the output directory exists.
pub fn validate(settings: &Settings) -> Result<(), FindTextError> {
    if !settings.input_path.exists() {
        return Err(FindTextError::InputNotFound(settings.input_path.clone()));
    }
    if !settings.search_terms_path.exists() {
        return Err(FindTextError::TermsNotFound(settings.search_terms_path.clone()));
    }
    if !settings.output_dir().is_dir() {
        return Err(FindTextError::OutputDirNotFound(settings.output_path.clone()));
    }
    debug!("Settings validated: {:?}", settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn accepts_existing_paths() -> TestResult {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.pdf");
        let terms = dir.path().join("terms.json");
        fs::write(&input, b"%PDF-1.7")?;
        fs::write(&terms, br#"{"text_terms": []}"#)?;
        let settings = Settings::new(&input, &terms, dir.path().join("out.pdf"));
        validate(&settings)?;
        Ok(())
    }

    #[test]
    fn reports_first_failure_in_order() -> TestResult {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.pdf");
        let terms = dir.path().join("terms.json");
        let output = dir.path().join("missing").join("out.pdf");

        // Nothing exists: the input is reported first.
        let settings = Settings::new(&input, &terms, &output);
        assert!(matches!(validate(&settings), Err(FindTextError::InputNotFound(_))));

        fs::write(&input, b"%PDF-1.7")?;
        assert!(matches!(validate(&settings), Err(FindTextError::TermsNotFound(_))));

        fs::write(&terms, b"{}")?;
        let err = validate(&settings).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("The path to the output PDF file does not exist.".to_string())
        );
        Ok(())
    }
}
