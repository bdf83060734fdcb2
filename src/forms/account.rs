//! Login and registration form rules.

use crate::forms::{
    validate_email, validate_name, validate_password, validate_phone, ValidationErrors,
};
use crate::models::RegisterData;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(message) = validate_email(&self.email) {
            errors.add("email", message);
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors.finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(message) = validate_name(&self.name) {
            errors.add("name", message);
        }
        if let Err(message) = validate_email(&self.email) {
            errors.add("email", message);
        }
        if let Err(message) = validate_password(&self.password) {
            errors.add("password", message);
        }
        if let Err(message) = validate_phone(&self.phone) {
            errors.add("phone", message);
        }

        errors.finish()
    }

    pub fn into_payload(self) -> Result<RegisterData, ValidationErrors> {
        self.validate()?;
        Ok(RegisterData {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            phone: self.phone.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterForm {
        RegisterForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let payload = valid_register().into_payload().unwrap();
        assert_eq!(payload.name, "Asha Rao");
        assert_eq!(payload.email, "asha@example.com");
    }

    #[test]
    fn test_short_password_rejected() {
        let mut form = valid_register();
        form.password = "12345".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.get("password").unwrap().contains("at least 6"));

        form.password = "123456".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut form = valid_register();
        form.email = "not-an-email".to_string();
        assert!(form.validate().unwrap_err().get("email").is_some());
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut form = valid_register();
        form.phone = "1234".to_string();
        assert!(form.validate().unwrap_err().get("phone").is_some());
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(form.validate().is_ok());

        let form = LoginForm::default();
        let errors = form.validate().unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }
}
