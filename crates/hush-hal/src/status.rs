/// Exception code carried by a failed interface call.
///
/// `None` is the success code; it never appears inside an `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[repr(i32)]
#[rustfmt::skip]
pub enum ExceptionCode {
    #[strum(serialize = "EX_NONE")]
    None                 = 0,
    #[strum(serialize = "EX_ILLEGAL_ARGUMENT")]
    IllegalArgument      = -3,
    #[strum(serialize = "EX_NULL_POINTER")]
    NullPointer          = -4,
    #[strum(serialize = "EX_ILLEGAL_STATE")]
    IllegalState         = -5,
    #[strum(serialize = "EX_UNSUPPORTED_OPERATION")]
    UnsupportedOperation = -7,
    #[strum(serialize = "EX_SERVICE_SPECIFIC")]
    ServiceSpecific      = -8,
    #[strum(serialize = "EX_TRANSACTION_FAILED")]
    TransactionFailed    = -129,
}

/// A failed interface call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Status {
    pub code: ExceptionCode,
    pub message: String,
}

impl Status {
    pub fn new(code: ExceptionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::IllegalArgument, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::IllegalState, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::UnsupportedOperation, message)
    }

    pub fn transaction_failed(message: impl Into<String>) -> Self {
        Self::new(ExceptionCode::TransactionFailed, message)
    }
}

/// Exception code of a call result, `ExceptionCode::None` on success.
pub fn code_of<T>(result: &Result<T, Status>) -> ExceptionCode {
    match result {
        Ok(_) => ExceptionCode::None,
        Err(status) => status.code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_wire_names() {
        let status = Status::illegal_argument("level out of range");
        assert_eq!(status.to_string(), "EX_ILLEGAL_ARGUMENT: level out of range");
    }

    #[test]
    fn code_of_ok_is_none() {
        let ok: Result<(), Status> = Ok(());
        assert_eq!(code_of(&ok), ExceptionCode::None);
        let err: Result<(), Status> = Err(Status::unsupported("nope"));
        assert_eq!(code_of(&err), ExceptionCode::UnsupportedOperation);
    }
}
