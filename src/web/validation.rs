use super::error::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
pub(crate) const MAX_EXPIRY_DAYS: i64 = 365;

/// Trims a required text field, rejecting blank values
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Normalises an email address to lowercase after a basic shape check
pub(crate) fn email(value: &str) -> Result<String, ApiError> {
    let value = value.trim().to_lowercase();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid || value.chars().any(char::is_whitespace) {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }
    Ok(value)
}

pub(crate) fn password(value: &str) -> Result<(), ApiError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn expiry_days(days: i64) -> Result<i64, ApiError> {
    if !(1..=MAX_EXPIRY_DAYS).contains(&days) {
        return Err(ApiError::BadRequest(format!(
            "expiry_days must be between 1 and {MAX_EXPIRY_DAYS}"
        )));
    }
    Ok(days)
}

/// Accepts an optional external link, which must be an http(s) URL
pub(crate) fn link(value: Option<&str>) -> Result<Option<String>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(link) if link.starts_with("https://") || link.starts_with("http://") => {
            Ok(Some(link.to_string()))
        }
        Some(_) => Err(ApiError::BadRequest(
            "link must be an http or https URL".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(email(" PI@Uni.Edu ").unwrap(), "pi@uni.edu");
        assert!(email("research.office@cs.uni.edu").is_ok());
        for bad in ["", "no-at-sign", "@uni.edu", "pi@localhost", "pi@@uni.edu", "pi@uni.", "p i@uni.edu"] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("title", "  Call for proposals ").unwrap(), "Call for proposals");
        assert_eq!(
            required("title", "   "),
            Err(ApiError::BadRequest("title is required".to_string()))
        );
    }

    #[test]
    fn test_password_length() {
        assert!(password("seven77").is_err());
        assert!(password("eight888").is_ok());
    }

    #[test]
    fn test_expiry_days_bounds() {
        assert!(expiry_days(0).is_err());
        assert!(expiry_days(-3).is_err());
        assert_eq!(expiry_days(1).unwrap(), 1);
        assert_eq!(expiry_days(365).unwrap(), 365);
        assert!(expiry_days(366).is_err());
    }

    #[test]
    fn test_link() {
        assert_eq!(link(None).unwrap(), None);
        assert_eq!(link(Some("  ")).unwrap(), None);
        assert_eq!(
            link(Some("https://research.uni.edu/calls")).unwrap().as_deref(),
            Some("https://research.uni.edu/calls")
        );
        assert!(link(Some("javascript:alert(1)")).is_err());
    }
}
