const MAX_OUTPUT_LENGTH: usize = 15_000;
const MAX_ERROR_LENGTH: usize = 2_000;

fn floor_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Keep the head and tail of a long agent response for logging.
pub fn truncate_output(output: &str) -> String {
    if output.len() <= MAX_OUTPUT_LENGTH {
        output.to_string()
    } else {
        let half = MAX_OUTPUT_LENGTH / 2;
        let start = &output[..floor_boundary(output, half)];
        let end = &output[ceil_boundary(output, output.len() - half)..];
        format!("{}\n\n... [truncated {} chars] ...\n\n{}", start, output.len() - MAX_OUTPUT_LENGTH, end)
    }
}

pub fn truncate_error(error: &str) -> String {
    if error.len() <= MAX_ERROR_LENGTH {
        error.to_string()
    } else {
        format!("{}...", &error[..floor_boundary(error, MAX_ERROR_LENGTH)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_error_untouched() {
        assert_eq!(truncate_error("exit status: 1"), "exit status: 1");
    }

    #[test]
    fn test_long_error_truncated_on_char_boundary() {
        let error = "é".repeat(MAX_ERROR_LENGTH);
        let truncated = truncate_error(&error);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_LENGTH + 3);
    }

    #[test]
    fn test_long_output_keeps_both_ends() {
        let output = format!("{}{}", "a".repeat(MAX_OUTPUT_LENGTH), "z".repeat(100));
        let truncated = truncate_output(&output);
        assert!(truncated.starts_with('a'));
        assert!(truncated.ends_with('z'));
        assert!(truncated.contains("[truncated 100 chars]"));
    }
}
