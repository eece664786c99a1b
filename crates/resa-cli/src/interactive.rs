//! Interactive follow-up session over a finished run.
//!
//! Built-in commands inspect the run's local analysis. Any other input is
//! sent to the model as a follow-up question and kept in the conversation
//! history, which can be exported as Markdown when the session ends.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use resa_core::{DataItem, Keyword, SentimentSnapshot, SourceKind, TrendSnapshot};
use resa_llm::{answer_question, extract_relevant_items, FollowupContext, TextGenerator};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
📖 Available commands:
  help, ?            Show this help
  focus <topic>      Deep dive into a specific sub-topic
  sentiment          Show the detailed sentiment breakdown
  keywords           Show all extracted keywords
  sources            Show a summary of the data sources
  exit, quit, q      End the session

Anything else is treated as a follow-up question about the research.";

/// Characters of the topic kept in an exported conversation's file name.
const EXPORT_TOPIC_CHARS: usize = 30;

/// What a session works from. Everything is borrowed from the finished run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionData<'a> {
    pub topic: &'a str,
    pub items: &'a [DataItem],
    pub analysis: &'a str,
    pub sentiment: Option<&'a SentimentSnapshot>,
    pub keywords: &'a [Keyword],
    pub trends: Option<&'a TrendSnapshot>,
}

impl<'a> SessionData<'a> {
    fn context(&self, topic: &'a str) -> FollowupContext<'a> {
        FollowupContext {
            topic,
            sentiment: self.sentiment,
            keywords: self.keywords,
            trends: self.trends,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Exchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reply {
    Exit,
    Text(String),
}

pub(crate) struct InteractiveSession<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
    data: SessionData<'a>,
    history: Vec<Exchange>,
}

impl<'a, G: TextGenerator + ?Sized> InteractiveSession<'a, G> {
    pub(crate) fn new(generator: &'a G, data: SessionData<'a>) -> Self {
        Self {
            generator,
            data,
            history: Vec::new(),
        }
    }

    pub(crate) fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Handle one line of user input.
    ///
    /// Blank input yields an empty reply. Failures come back as `❌` text.
    pub(crate) async fn handle(&mut self, input: &str) -> Reply {
        let input = input.trim();
        if input.is_empty() {
            return Reply::Text(String::new());
        }

        let lowered = input.to_lowercase();
        match lowered.as_str() {
            "exit" | "quit" | "q" => return Reply::Exit,
            "help" | "?" => return Reply::Text(HELP.to_string()),
            "sentiment" => return Reply::Text(self.sentiment_details()),
            "keywords" => return Reply::Text(self.keyword_list()),
            "sources" => return Reply::Text(self.sources_summary()),
            _ => {}
        }

        if let Some(focus) = focus_target(input) {
            return Reply::Text(self.focus(focus).await);
        }

        let context = self.data.context(self.data.topic);
        match answer_question(
            self.generator,
            input,
            self.data.items,
            self.data.analysis,
            &context,
        )
        .await
        {
            Ok(answer) => {
                self.history.push(Exchange {
                    question: input.to_string(),
                    answer: answer.clone(),
                });
                Reply::Text(answer)
            }
            Err(e) => {
                tracing::warn!(error = %e, "follow-up question failed");
                Reply::Text(format!("❌ Error processing question: {e}"))
            }
        }
    }

    async fn focus(&self, focus: &str) -> String {
        let relevant: Vec<DataItem> = extract_relevant_items(focus, self.data.items)
            .into_iter()
            .cloned()
            .collect();
        if relevant.is_empty() {
            return format!("❌ No data found related to '{focus}'");
        }

        let question = format!(
            "Provide a detailed analysis focusing specifically on {focus}. \
             Include key points, sentiment, and any notable insights."
        );
        let context = self.data.context(focus);
        match answer_question(
            self.generator,
            &question,
            &relevant,
            self.data.analysis,
            &context,
        )
        .await
        {
            Ok(answer) => format!(
                "**Focus: {focus}** (found {} relevant items)\n\n{answer}",
                relevant.len()
            ),
            Err(e) => format!("❌ Error processing question: {e}"),
        }
    }

    fn sentiment_details(&self) -> String {
        let Some(sentiment) = self.data.sentiment else {
            return "❌ Sentiment analysis not available".to_string();
        };
        let dist = &sentiment.distribution;
        format!(
            "😊 Sentiment Analysis\n\n\
             Overall: {} (compound {:+.3})\n\
             Items analyzed: {}\n\n\
             Positive: {} ({:.1}%)\n\
             Neutral:  {} ({:.1}%)\n\
             Negative: {} ({:.1}%)",
            sentiment.overall,
            sentiment.average_compound,
            sentiment.total_analyzed,
            dist.positive.count,
            dist.positive.percentage,
            dist.neutral.count,
            dist.neutral.percentage,
            dist.negative.count,
            dist.negative.percentage,
        )
    }

    fn keyword_list(&self) -> String {
        let keywords = self.data.keywords;
        if keywords.is_empty() {
            return "❌ Keywords not available".to_string();
        }

        let mut out = String::from("🔑 Top Keywords\n");
        let tiers: [(&str, &str, &[Keyword]); 3] = [
            ("\n🔥 Top 5:", "🔥", &keywords[..keywords.len().min(5)]),
            (
                "\n📌 Notable:",
                "📌",
                keywords.get(5..keywords.len().min(15)).unwrap_or_default(),
            ),
            (
                "\n• Others:",
                "•",
                keywords
                    .get(15..)
                    .map(|rest| &rest[..rest.len().min(10)])
                    .unwrap_or_default(),
            ),
        ];
        for (heading, marker, tier) in tiers {
            if tier.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{heading}");
            for kw in tier {
                let _ = writeln!(out, "  {marker} {} ({:.3})", kw.keyword, kw.score);
            }
        }
        out.trim_end().to_string()
    }

    fn sources_summary(&self) -> String {
        let items = self.data.items;
        let count = |kind: SourceKind| items.iter().filter(|i| i.source() == kind).count();
        let mut out = format!("📚 Data Sources\n\nTotal items: {}\n", items.len());
        for kind in SourceKind::ALL {
            let _ = writeln!(out, "  {}: {}", kind.label(), count(kind));
        }
        if let Some(trends) = self.data.trends {
            let range = &trends.date_range;
            let _ = writeln!(out, "\nDate range: {} to {}", range.start, range.end);
        }
        out.trim_end().to_string()
    }

    /// Write the question history as Markdown.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub(crate) fn export_conversation(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, render_conversation(self.data.topic, &self.history))
    }
}

/// `focus <topic>`, matched case-insensitively on the command word.
fn focus_target(input: &str) -> Option<&str> {
    let (command, rest) = input.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    (command.eq_ignore_ascii_case("focus") && !rest.is_empty()).then_some(rest)
}

pub(crate) fn render_conversation(topic: &str, history: &[Exchange]) -> String {
    let mut out = format!("# Interactive Session: {topic}\n\n");
    for (i, exchange) in history.iter().enumerate() {
        let _ = write!(
            out,
            "## Question {}\n{}\n\n### Answer\n{}\n\n---\n\n",
            i + 1,
            exchange.question,
            exchange.answer
        );
    }
    out
}

/// `conversation_{topic}_{YYYYmmdd_HHMMSS}.md` with spaces in the topic
/// replaced by dashes.
pub(crate) fn conversation_filename(topic: &str, now: chrono::NaiveDateTime) -> String {
    let slug: String = topic
        .replace(' ', "-")
        .chars()
        .take(EXPORT_TOPIC_CHARS)
        .collect();
    format!("conversation_{slug}_{}.md", now.format("%Y%m%d_%H%M%S"))
}

async fn prompt_line(
    lines: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    lines.next_line().await.context("failed to read stdin")
}

/// Read questions from stdin until the user exits or input ends, then offer
/// to save the conversation under `output_dir`.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail, or the export cannot be written.
pub(crate) async fn run_session<G: TextGenerator + ?Sized>(
    mut session: InteractiveSession<'_, G>,
    output_dir: &Path,
) -> anyhow::Result<()> {
    println!("\n💬 Interactive mode. Type 'help' for commands, 'exit' to quit.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = prompt_line(&mut lines, "You: ").await? {
        match session.handle(&line).await {
            Reply::Exit => break,
            Reply::Text(text) if text.is_empty() => {}
            Reply::Text(text) => println!("\n{text}\n"),
        }
    }

    if session.history().is_empty() {
        println!("👋 Session ended.");
        return Ok(());
    }

    let answer = prompt_line(&mut lines, "\nSave conversation? (y/n): ").await?;
    if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
        let now = chrono::Local::now().naive_local();
        let path: PathBuf = output_dir.join(conversation_filename(session.data.topic, now));
        session
            .export_conversation(&path)
            .with_context(|| format!("failed to save conversation {}", path.display()))?;
        println!("✅ Conversation saved to: {}", path.display());
    }
    println!("👋 Session ended.");
    Ok(())
}

#[cfg(test)]
#[path = "interactive_test.rs"]
mod tests;
