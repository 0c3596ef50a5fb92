//! Quoting for command lines echoed back in output.
//!
//! Arguments are always passed to processes as argv, never through a shell;
//! quoting here only makes reported commands copy-pasteable when artifact
//! paths contain spaces or other shell metacharacters.

const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}', '<',
    '>', '|', '&', ';', '#', '~',
];

/// Quote a single argument for display in a shell command line.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Quote and join multiple arguments for display.
pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_arg_plain() {
        assert_eq!(
            quote_arg("dist/fkbutils-0.1.1.tar.gz"),
            "dist/fkbutils-0.1.1.tar.gz"
        );
    }

    #[test]
    fn quote_arg_with_spaces() {
        assert_eq!(quote_arg("dist/my pkg.tar.gz"), "'dist/my pkg.tar.gz'");
    }

    #[test]
    fn quote_arg_with_single_quote() {
        assert_eq!(quote_arg("it's"), "'it'\\''s'");
    }

    #[test]
    fn quote_arg_empty() {
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn quote_args_mixed() {
        let args = vec!["upload".to_string(), "dist/my pkg.whl".to_string()];
        assert_eq!(quote_args(&args), "upload 'dist/my pkg.whl'");
    }
}
