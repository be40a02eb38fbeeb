//! Line-oriented terminal dialogs

use async_trait::async_trait;
use modsmith_core::{ChoiceRequest, InteractiveUi, Message, ModLoader};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{info, warn};

/// Presents dialogs as numbered prompts and reads answers line by line
///
/// Options are chosen by their 1-based number. An empty line, `c`, or end of
/// input cancels.
pub struct TerminalUi<R> {
    input: tokio::sync::Mutex<R>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalUi<BufReader<Stdin>> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), Box::new(std::io::stdout()))
    }
}

impl<R> TerminalUi<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: tokio::sync::Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn print(&self, text: &str) {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = output.write_all(text.as_bytes()).and_then(|()| output.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }

    async fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match self.input.lock().await.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read from terminal: {}", e);
                None
            }
        }
    }
}

/// Interpret one answer line: `Ok(None)` cancels, `Err` asks again
fn parse_answer(line: &str, options: usize, allow_cancel: bool) -> Result<Option<usize>, ()> {
    if line.is_empty() || line.eq_ignore_ascii_case("c") {
        return if allow_cancel { Ok(None) } else { Err(()) };
    }

    match line.parse::<usize>() {
        Ok(n) if (1..=options).contains(&n) => Ok(Some(n - 1)),
        _ => Err(()),
    }
}

#[async_trait]
impl<R> InteractiveUi for TerminalUi<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn present_choice(&self, request: ChoiceRequest) -> Option<usize> {
        let mut prompt = format!("\n{}\n{}\n", request.title, request.text);
        for (i, option) in request.options.iter().enumerate() {
            prompt.push_str(&format!("  {}) {}\n", i + 1, option));
        }
        self.print(&prompt);

        let hint = if request.allow_cancel {
            format!("Choose 1-{} (Enter to cancel): ", request.options.len())
        } else {
            format!("Choose 1-{}: ", request.options.len())
        };

        loop {
            self.print(&hint);
            // End of input always cancels, there is nobody left to ask
            let line = self.read_line().await?;
            match parse_answer(&line, request.options.len(), request.allow_cancel) {
                Ok(choice) => return choice,
                Err(()) => self.print(&format!("Invalid choice: {}\n", line)),
            }
        }
    }

    async fn show_message(&self, message: Message) {
        let mut text = format!("\n{}\n{}\n", message.title, message.text);
        if let Some(detail) = &message.detail {
            text.push_str(&format!("\n{}\n", detail));
        }
        self.print(&text);
    }

    fn open_repatch_flow(&self, loader: ModLoader) {
        info!("Repatch requested for {}", loader);
        self.print(&format!(
            "\nRepatch the app with {} to use this mod, then import it again.\n",
            loader
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui(input: &'static str) -> TerminalUi<&'static [u8]> {
        TerminalUi::new(input.as_bytes(), Box::new(std::io::sink()))
    }

    fn request() -> ChoiceRequest {
        ChoiceRequest::new(
            "Multiple import options",
            "pick one",
            vec!["Hat".to_string(), "Saber".to_string()],
        )
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("1", 2, true), Ok(Some(0)));
        assert_eq!(parse_answer("2", 2, true), Ok(Some(1)));
        assert_eq!(parse_answer("", 2, true), Ok(None));
        assert_eq!(parse_answer("C", 2, true), Ok(None));
        assert_eq!(parse_answer("0", 2, true), Err(()));
        assert_eq!(parse_answer("3", 2, true), Err(()));
        assert_eq!(parse_answer("hat", 2, true), Err(()));
        assert_eq!(parse_answer("", 2, false), Err(()));
    }

    #[tokio::test]
    async fn test_choice_by_number() {
        assert_eq!(ui("2\n").present_choice(request()).await, Some(1));
    }

    #[tokio::test]
    async fn test_invalid_answer_asks_again() {
        assert_eq!(ui("7\nx\n1\n").present_choice(request()).await, Some(0));
    }

    #[tokio::test]
    async fn test_empty_line_cancels() {
        assert_eq!(ui("\n1\n").present_choice(request()).await, None);
    }

    #[tokio::test]
    async fn test_end_of_input_cancels() {
        assert_eq!(ui("").present_choice(request()).await, None);
    }
}
