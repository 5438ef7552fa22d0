//! Word-by-word emission of a finished answer.

use std::time::Duration;

use futures::Stream;
use futures::stream;

/// Turns `answer` into a lazy stream of `token + " "` chunks.
///
/// Tokens are the maximal non-whitespace runs, left to right. `delay` is
/// awaited before every chunk except the first. Whitespace-only input
/// yields an empty stream.
///
/// # Example
/// ```
/// use futures::StreamExt;
/// # #[tokio::main] async fn main() {
/// let chunks: Vec<String> = contextor::present("a  b\nc".into(), std::time::Duration::ZERO)
///     .collect()
///     .await;
/// assert_eq!(chunks, ["a ", "b ", "c "]);
/// # }
/// ```
pub fn present(answer: String, delay: Duration) -> impl Stream<Item = String> + Send + 'static {
    stream::unfold((answer, 0usize), move |(answer, pos)| async move {
        let (start, end) = next_token(&answer, pos)?;
        if pos > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let chunk = format!("{} ", &answer[start..end]);
        Some((chunk, (answer, end)))
    })
}

/// Byte range of the next token at or after `from`.
fn next_token(s: &str, from: usize) -> Option<(usize, usize)> {
    let start = from + s[from..].find(|c: char| !c.is_whitespace())?;
    let end = s[start..].find(char::is_whitespace).map_or(s.len(), |i| start + i);
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Instant;

    async fn collect(answer: &str) -> Vec<String> {
        present(answer.to_string(), Duration::ZERO).collect().await
    }

    #[tokio::test]
    async fn chunks_follow_whitespace_tokens() {
        let answer = "The funding is 2 million euros.";
        let chunks = collect(answer).await;
        assert_eq!(chunks, ["The ", "funding ", "is ", "2 ", "million ", "euros. "]);

        let rebuilt: Vec<String> = chunks.iter().map(|c| c.trim_end().to_string()).collect();
        let expected: Vec<&str> = answer.split_whitespace().collect();
        assert_eq!(rebuilt, expected);
    }

    #[tokio::test]
    async fn mixed_unicode_whitespace() {
        let chunks = collect("  Étape\t1\u{00A0}\n\n fin ").await;
        assert_eq!(chunks, ["Étape ", "1 ", "fin "]);
    }

    #[tokio::test]
    async fn empty_and_blank_answers_emit_nothing() {
        assert!(collect("").await.is_empty());
        assert!(collect(" \n\t ").await.is_empty());
    }

    #[tokio::test]
    async fn delay_applies_between_chunks_only() {
        let delay = Duration::from_millis(20);

        let started = Instant::now();
        let one: Vec<String> = present("single".into(), delay).collect().await;
        assert_eq!(one, ["single "]);
        assert!(started.elapsed() < delay);

        let started = Instant::now();
        let three: Vec<String> = present("a b c".into(), delay).collect().await;
        assert_eq!(three.len(), 3);
        assert!(started.elapsed() >= delay * 2);
    }
}
