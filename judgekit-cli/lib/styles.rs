use clap::builder::styling::{AnsiColor, Effects, Style, Styles};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const HEADER: Style = AnsiColor::Yellow.on_default().effects(Effects::BOLD);
const LITERAL: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = AnsiColor::Cyan.on_default();
const ERROR: Style = AnsiColor::Red.on_default().effects(Effects::BOLD);

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Renders text in the styles `jk` uses for its help output.
pub trait AnsiStyles {
    /// Styles text as a section header.
    fn header(&self) -> String;

    /// Styles text as something typed literally, like a flag or a command.
    fn literal(&self) -> String;

    /// Styles text as a value to fill in.
    fn placeholder(&self) -> String;

    /// Styles text as an error.
    fn error(&self) -> String;
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// The clap styles for `jk`.
pub fn styles() -> Styles {
    Styles::styled()
        .header(HEADER)
        .usage(HEADER)
        .literal(LITERAL)
        .placeholder(PLACEHOLDER)
        .error(ERROR)
        .valid(LITERAL)
        .invalid(ERROR)
}

fn paint(style: Style, text: &str) -> String {
    format!("{style}{text}{style:#}")
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<T: AsRef<str> + ?Sized> AnsiStyles for T {
    fn header(&self) -> String {
        paint(HEADER, self.as_ref())
    }

    fn literal(&self) -> String {
        paint(LITERAL, self.as_ref())
    }

    fn placeholder(&self) -> String {
        paint(PLACEHOLDER, self.as_ref())
    }

    fn error(&self) -> String {
        paint(ERROR, self.as_ref())
    }
}
