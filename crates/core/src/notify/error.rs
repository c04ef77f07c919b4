use std::fmt;

#[derive(Debug, Clone)]
pub struct SendDiagnosticsError {
    pub provider: &'static str,
    pub status: u16,
    pub code: Option<i64>,
    pub detail: String,
}

impl fmt::Display for SendDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(
                f,
                "send failed (provider={}, status={}, code={code}): {}",
                self.provider, self.status, self.detail
            ),
            None => write!(
                f,
                "send failed (provider={}, status={}): {}",
                self.provider, self.status, self.detail
            ),
        }
    }
}

impl std::error::Error for SendDiagnosticsError {}
