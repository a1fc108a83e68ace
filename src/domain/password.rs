use validator::ValidationError;
use zxcvbn::zxcvbn;

pub const MIN_LENGTH: usize = 6;
const MIN_STRENGTH_SCORE: u8 = 2;

/// Length floor plus a zxcvbn estimate that rejects guessable passwords.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Password must be at least {} characters", MIN_LENGTH).into());
        return Err(error);
    }

    let estimate = zxcvbn(password, &[]);
    let score = estimate.score() as u8;

    if score < MIN_STRENGTH_SCORE {
        let feedback = estimate.feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Password is too easy to guess".to_string());

        let mut error = ValidationError::new("password_strength");
        error.message = Some(format!("Password is too weak: {}", feedback).into());
        return Err(error);
    }

    Ok(())
}
