//! Writing compile commands in the JSON compilation database format.
//!
//! The output always uses the `command` form. Arguments are joined with
//! POSIX shell quoting restricted to what the format allows: `"` and `\`
//! are the only special characters, so splitting the command string again
//! yields the original argument vector.

use std::borrow::Borrow;
use std::io::{self, Write};

use crate::command::CompileCommand;

/// Joins arguments into a single shell command string.
///
/// An argument is wrapped in double quotes when it contains whitespace or a
/// single quote, is empty, or starts with `#`. Backslashes and double
/// quotes are escaped in every argument.
pub fn arguments_to_command<S: AsRef<str>>(arguments: &[S]) -> String {
    let mut command = String::new();
    for (i, argument) in arguments.iter().enumerate() {
        let argument = argument.as_ref();
        if i != 0 {
            command.push(' ');
        }
        let need_quoting = argument.is_empty()
            || argument.starts_with('#')
            || argument.contains(|c: char| c.is_whitespace() || c == '\'');
        if need_quoting {
            command.push('"');
        }
        for c in argument.chars() {
            if c == '\\' || c == '"' {
                command.push('\\');
            }
            command.push(c);
        }
        if need_quoting {
            command.push('"');
        }
    }
    command
}

/// Streams compile commands as a JSON array.
///
/// Call [`serialize`](Self::serialize) for each command, then
/// [`finish`](Self::finish) to close the array.
pub struct JsonSerializer<W: Write> {
    writer: W,
    count: usize,
}

impl<W: Write> JsonSerializer<W> {
    /// Writes the opening bracket.
    pub fn begin(mut writer: W) -> io::Result<Self> {
        writer.write_all(b"[\n")?;
        Ok(Self { writer, count: 0 })
    }

    /// Writes one compile command.
    pub fn serialize(&mut self, compile_command: &CompileCommand) -> io::Result<()> {
        if self.count != 0 {
            self.writer.write_all(b",\n\n")?;
        }
        let w = &mut self.writer;
        w.write_all(b"{\n  \"directory\": ")?;
        write_json_string(w, &compile_command.directory().to_string_lossy())?;
        w.write_all(b",\n  \"command\": ")?;
        write_json_string(w, &arguments_to_command(compile_command.arguments()))?;
        w.write_all(b",\n  \"file\": ")?;
        write_json_string(w, &compile_command.file().to_string_lossy())?;
        if let Some(output) = compile_command.output() {
            w.write_all(b",\n  \"output\": ")?;
            write_json_string(w, &output.to_string_lossy())?;
        }
        w.write_all(b"\n}")?;
        self.count += 1;
        Ok(())
    }

    /// Writes the closing bracket and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.count != 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(b"]\n")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_json_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    serde_json::to_writer(writer, value).map_err(io::Error::from)
}

/// Writes all compile commands as a JSON compilation database.
pub fn write_compile_commands<W, I>(writer: W, compile_commands: I) -> io::Result<W>
where
    W: Write,
    I: IntoIterator,
    I::Item: Borrow<CompileCommand>,
{
    let mut serializer = JsonSerializer::begin(writer)?;
    for compile_command in compile_commands {
        serializer.serialize(compile_command.borrow())?;
    }
    serializer.finish()
}
