use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Drains `reader` to end of stream and returns its trimmed lines in order.
///
/// A read error ends the sequence early; whatever was collected so far is
/// returned. A pipe closed by an exiting process is the normal way out.
pub async fn read_lines<R>(reader: R) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut collected = Vec::new();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => collected.push(line.trim().to_string()),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Line reader stopped early: {}", e);
                break;
            }
        }
    }

    collected
}

/// Runs [`read_lines`] on its own task. The handle resolves once, when the
/// stream closes.
pub fn spawn_line_reader<R>(reader: R) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(read_lines(reader))
}
