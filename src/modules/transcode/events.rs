use std::fmt;

/// One line of the `/upload` response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Progress(u8),
    Download(String),
    Done,
    Error,
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Done | JobEvent::Error)
    }

    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobEvent::Progress(pct) => write!(f, "progress:{pct}"),
            JobEvent::Download(url) => write!(f, "download:{url}"),
            JobEvent::Done => f.write_str("status:done"),
            JobEvent::Error => f.write_str("status:error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_protocol_lines() {
        assert_eq!(JobEvent::Progress(42).to_line(), "progress:42\n");
        assert_eq!(
            JobEvent::Download("http://localhost:3001/downloads/a.mp4".into()).to_line(),
            "download:http://localhost:3001/downloads/a.mp4\n"
        );
        assert_eq!(JobEvent::Done.to_line(), "status:done\n");
        assert_eq!(JobEvent::Error.to_line(), "status:error\n");
    }

    #[test]
    fn only_status_lines_are_terminal() {
        assert!(JobEvent::Done.is_terminal());
        assert!(JobEvent::Error.is_terminal());
        assert!(!JobEvent::Progress(100).is_terminal());
        assert!(!JobEvent::Download(String::new()).is_terminal());
    }
}
