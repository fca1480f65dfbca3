use crate::Result;
use crate::callbacks::Callback;
use crate::llm::Message;
use async_trait::async_trait;
use std::io::Write;

pub struct MessageLogger<W: Write + Send> {
    writer: W,
    written: usize,
    step: u32,
}

impl<W: Write + Send> MessageLogger<W> {
    pub fn new(name: &str, mut writer: W) -> Result<Box<Self>> {
        write!(writer, "## {}\n\n", name)?;

        Ok(Box::new(Self {
            writer,
            written: 0,
            step: 0,
        }))
    }
}

#[async_trait]
impl<W: Write + Send> Callback for MessageLogger<W> {
    // history is append-only, so only messages past the watermark are new
    async fn call(&mut self, messages: Vec<Message>) -> Result<Vec<Message>> {
        write!(self.writer, "### Step {}\n", self.step)?;

        messages[self.written..]
            .iter()
            .try_for_each(|msg| write!(self.writer, "{}", msg))?;

        write!(self.writer, "---\n")?;
        self.writer.flush()?;

        self.step += 1;
        self.written = messages.len();

        Ok(messages)
    }
}
