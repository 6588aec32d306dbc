//! Line-based prompts. Generic over reader/writer so they can be tested.

use anyhow::Result;
use std::io::{BufRead, Write};

/// Ask a yes/no question. Anything but y/yes (any case) is a no; EOF is a no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Ask for a number in `1..=max`. Re-asks on invalid input; an empty line or
/// EOF cancels with `None`.
pub fn choose<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    max: usize,
) -> Result<Option<usize>> {
    loop {
        write!(output, "Enter a number (1-{}), empty to cancel: ", max)?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
            _ => writeln!(output, "Invalid choice: {}", line)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn confirm_accepts_yes_variants() {
        for answer in ["y\n", "YES\n", " yes \n"] {
            let mut out = Vec::new();
            assert!(confirm(&mut Cursor::new(answer), &mut out, "Download?").unwrap());
            assert_eq!(String::from_utf8(out).unwrap(), "Download? [y/N] ");
        }
    }

    #[test]
    fn confirm_defaults_to_no() {
        for answer in ["\n", "n\n", "maybe\n", ""] {
            let mut out = Vec::new();
            assert!(!confirm(&mut Cursor::new(answer), &mut out, "Download?").unwrap());
        }
    }

    #[test]
    fn choose_retries_until_valid() {
        let mut out = Vec::new();
        let picked = choose(&mut Cursor::new("0\nabc\n3\n2\n"), &mut out, 2).unwrap();
        assert_eq!(picked, Some(2));
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Invalid choice").count(), 3);
    }

    #[test]
    fn choose_cancels_on_empty_or_eof() {
        let mut out = Vec::new();
        assert_eq!(choose(&mut Cursor::new("\n"), &mut out, 5).unwrap(), None);
        assert_eq!(choose(&mut Cursor::new(""), &mut out, 5).unwrap(), None);
    }
}
