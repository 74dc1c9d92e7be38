use std::io::{self, BufRead, Write};

const PROMPT: &str = "Enter your username: ";

/// Ask for the player's name until a non-blank one is entered.  Surrounding
/// whitespace is stripped.  Returns `None` if input ends first.
pub(crate) fn player_name<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<Option<String>> {
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }
        let name = line.trim();
        if !name.is_empty() {
            return Ok(Some(name.to_owned()));
        }
        writeln!(output, "The username cannot be blank.")?;
    }
}
