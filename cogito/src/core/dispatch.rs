//! Classification of step commands into dispatch kinds.

/// Token that marks a directory-change command.
pub const CHANGE_DIR_MARKER: &str = "cd";

/// How a step command is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Handled in-process against the tracked working directory. Holds the
    /// trimmed path argument.
    ChangeDirectory(String),
    /// Handed to the external shell unchanged.
    Shell(String),
}

/// Classify `cmd`.
///
/// - `ChangeDirectory` if `cmd` is the marker followed by whitespace; the
///   remainder (trimmed) is the path argument.
/// - `Shell` otherwise, including a bare `cd` and words that merely start
///   with `cd` (`cdrecord`).
///
/// A `cd` inside a child shell would not affect later steps, so these
/// commands must never reach the shell.
pub fn classify(cmd: &str) -> Dispatch {
    match cmd.strip_prefix(CHANGE_DIR_MARKER) {
        Some(rest) if rest.starts_with(char::is_whitespace) => {
            Dispatch::ChangeDirectory(rest.trim().to_string())
        }
        _ => Dispatch::Shell(cmd.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_cd_with_argument() {
        assert_eq!(
            classify("cd foo-project"),
            Dispatch::ChangeDirectory("foo-project".to_string())
        );
    }

    #[test]
    fn classify_trims_argument() {
        assert_eq!(
            classify("cd   ../up  "),
            Dispatch::ChangeDirectory("../up".to_string())
        );
    }

    #[test]
    fn classify_mkdir_is_shell() {
        assert_eq!(
            classify("mkdir foo-project"),
            Dispatch::Shell("mkdir foo-project".to_string())
        );
    }

    #[test]
    fn classify_bare_cd_is_shell() {
        assert_eq!(classify("cd"), Dispatch::Shell("cd".to_string()));
    }

    #[test]
    fn classify_similar_prefix_is_shell() {
        assert_eq!(
            classify("cdrecord image.iso"),
            Dispatch::Shell("cdrecord image.iso".to_string())
        );
    }

    #[test]
    fn classify_leading_space_is_shell() {
        assert_eq!(classify(" cd foo"), Dispatch::Shell(" cd foo".to_string()));
    }
}
