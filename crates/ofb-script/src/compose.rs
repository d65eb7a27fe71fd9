//! Script composer.
//!
//! Assembles reusable handler fragments and a body into one executable
//! program. Handlers must be declared at the top level of the program -
//! the interpreter rejects handler declarations nested inside `tell`
//! blocks - so fragments always precede the addressing block. That
//! ordering is a correctness constraint, not formatting taste.

/// A fully composed program, ready for one execution.
///
/// Constructible only through [`compose`]/[`compose_bare`], which accept
/// validated values exclusively; holding a `ScriptProgram` implies every
/// interpolated value went through the validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptProgram(String);

impl ScriptProgram {
    /// The program text, for handing to the process executor.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw program text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ScriptProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compose handler fragments and a body into one program.
///
/// Fragments are concatenated in caller order, separated by blank lines,
/// followed by the body wrapped in the fixed addressing block
/// (`tell application "OmniFocus"` / `tell default document`).
#[must_use]
pub fn compose(fragments: &[&str], body: &str) -> ScriptProgram {
    let mut program = String::new();
    for fragment in fragments {
        program.push_str(fragment.trim_end());
        program.push_str("\n\n");
    }
    program.push_str("tell application \"OmniFocus\"\n");
    program.push_str("\ttell default document\n");
    for line in body.lines() {
        program.push_str("\t\t");
        program.push_str(line);
        program.push('\n');
    }
    program.push_str("\tend tell\n");
    program.push_str("end tell\n");
    ScriptProgram(program)
}

/// Compose a one-shot program with no handler fragments.
#[must_use]
pub fn compose_bare(body: &str) -> ScriptProgram {
    compose(&[], body)
}
