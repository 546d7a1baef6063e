/// The print callback every command reports through.
pub trait Printer: Send + Sync {
    fn print(&self, message: &str);
}

impl<F> Printer for F
where
    F: Fn(&str) + Send + Sync,
{
    fn print(&self, message: &str) {
        self(message)
    }
}

/// Writes each message to stdout on its own line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&self, message: &str) {
        println!("{message}");
    }
}
