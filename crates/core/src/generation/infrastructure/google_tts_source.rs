use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::generation::domain::narration_source::NarrationSource;

/// The endpoint rejects longer `q` values.
const MAX_CHUNK_CHARS: usize = 100;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Narration through the Google Translate speech endpoint.
///
/// Text is sent in chunks of at most 100 characters; the returned MP3
/// segments are concatenated into one file, which MP3 decoders accept.
pub struct GoogleTtsNarrationSource {
    client: reqwest::blocking::Client,
    language: String,
    tld: String,
}

impl GoogleTtsNarrationSource {
    pub fn new(language: &str, tld: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            language: language.to_string(),
            tld: tld.to_string(),
        })
    }

    fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let url = format!("https://translate.google.{}/translate_tts", self.tld);
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let bytes = self
            .client
            .get(url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()?
            .error_for_status()?
            .bytes()?;
        if bytes.is_empty() {
            return Err("speech endpoint returned an empty body".into());
        }
        Ok(bytes.to_vec())
    }
}

impl NarrationSource for GoogleTtsNarrationSource {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err("nothing to narrate".into());
        }

        let mut file = fs::File::create(output)?;
        for (idx, chunk) in chunks.iter().enumerate() {
            let audio = self.fetch_chunk(chunk, idx, chunks.len())?;
            file.write_all(&audio)?;
        }
        file.flush()?;
        log::debug!(
            "Narrated {} chunks into {}",
            chunks.len(),
            output.display()
        );
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "mp3"
    }
}

/// Splits text into chunks of at most `max_chars`, preferring sentence
/// boundaries, then word boundaries, then a hard cut.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            flush(&mut chunks, &mut current);
            let cut = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            chunks.push(word[..cut].to_string());
            word = &word[cut..];
        }
        if word.is_empty() {
            continue;
        }

        let joined_len = current.chars().count() + 1 + word.chars().count();
        if !current.is_empty() && joined_len > max_chars {
            flush(&mut chunks, &mut current);
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        if word.ends_with(['.', '!', '?']) {
            flush(&mut chunks, &mut current);
        }
    }
    flush(&mut chunks, &mut current);
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}
