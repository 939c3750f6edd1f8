use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product `{product}` has an unparseable price `{price}`")]
    InvalidPrice { product: String, price: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "Sorry, I couldn't complete that request. Please check the details and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The shopping assistant is temporarily unavailable. Please retry shortly."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Persistence(message) | ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn domain_error_maps_to_bad_request_interface_error() {
        let interface = ApplicationError::from(DomainError::InvalidPrice {
            product: "Laptop A".to_owned(),
            price: "$abc".to_owned(),
        })
        .into_interface("session-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "session-1"
        ));
        assert!(interface.to_string().contains("Laptop A"));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface = ApplicationError::from(DomainError::InvalidPrice {
            product: "Laptop A".to_owned(),
            price: "$abc".to_owned(),
        })
        .into_interface("session-2");

        assert!(!interface.user_message().contains("$abc"));
        assert_eq!(interface.correlation_id(), "session-2");
    }

    #[test]
    fn integration_error_maps_to_service_unavailable() {
        let interface = ApplicationError::Integration("model backend timed out".to_owned())
            .into_interface("session-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The shopping assistant is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn every_application_error_maps_to_a_user_safe_interface_error() {
        let cases = [
            ApplicationError::Domain(DomainError::InvalidPrice {
                product: "Mystery Box".to_owned(),
                price: "TBD".to_owned(),
            }),
            ApplicationError::Persistence("session store unavailable".to_owned()),
            ApplicationError::Integration("model backend returned status 500".to_owned()),
        ];

        for error in cases {
            let interface = error.into_interface("session-4");
            assert_eq!(interface.correlation_id(), "session-4");
            assert!(!interface.user_message().contains("TBD"));
            assert!(!interface.user_message().contains("500"));
        }
    }
}
