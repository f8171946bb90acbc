use std::path::PathBuf;
use std::fmt::Display;

pub trait ErrorType: Display + PartialEq {}

// Where in the grammar text an error was found. A line of 0 means the error
// belongs to the grammar as a whole
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Location {
    pub file: Option<PathBuf>,
    pub line: usize
}

impl Location {
    pub fn line(line: usize) -> Self {
        Location { file: None, line }
    }

    pub fn whole() -> Self {
        Location { file: None, line: 0 }
    }

    pub fn in_file(self, file: &PathBuf) -> Self {
        Location { file: Some(file.clone()), ..self }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), 0) => write!(f, "{}", file.display()),
            (Some(file), line) => write!(f, "{}:{}", file.display(), line),
            (None, 0) => write!(f, "grammar"),
            (None, line) => write!(f, "line {}", line),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        let file = PathBuf::from("grammars/ab.grammar");
        assert_eq!(Location::whole().to_string(), "grammar");
        assert_eq!(Location::line(4).to_string(), "line 4");
        assert_eq!(Location::line(4).in_file(&file).to_string(), "grammars/ab.grammar:4");
        assert_eq!(Location::whole().in_file(&file).to_string(), "grammars/ab.grammar");
    }
}
