/// Advisory and error messages collected while answering a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl JobStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
        self.errors.clear();
    }

    /// True when no error has been recorded; warnings do not count
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
