/// Human-readable entity label used in logs and pick reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Name(pub &'static str);

impl Name {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
