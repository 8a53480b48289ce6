//! Text views. Every renderer is a pure function of a [`RenderContext`] and
//! the snapshots it is given.

use std::fmt::Write;

use solana_sdk::pubkey::Pubkey;
use time::macros::format_description;
use time::OffsetDateTime;
use votingdapp_client::{CandidateView, PollDetail, PollStatus, PollView};

const LIST_DESCRIPTION_LEN: usize = 25;

/// What the views need to know beyond the data they show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub wallet: Option<Pubkey>,
    pub initialized: bool,
    pub now_ms: u64,
}

pub fn format_timestamp(ms: u64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .ok()
        .and_then(|datetime| datetime.format(&format).ok())
        .unwrap_or_else(|| format!("{ms} ms"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn status_label(status: PollStatus) -> &'static str {
    match status {
        PollStatus::Upcoming => "Upcoming",
        PollStatus::Open => "Open",
        PollStatus::Ended => "Ended",
    }
}

pub fn render_poll_list(ctx: &RenderContext, polls: &[PollView]) -> String {
    let mut out = String::new();

    if polls.is_empty() {
        let message = match (ctx.initialized, ctx.wallet) {
            (true, _) => "We don't have any polls yet, be the first to create one!",
            (false, None) => "We don't have any polls yet, please connect your wallet.",
            (false, Some(_)) => {
                "The program is not initialized yet. Run `votingdapp init` to initialize it."
            }
        };
        out.push_str(message);
        return out;
    }

    out.push_str("List of Polls\n");
    for poll in polls {
        let _ = write!(
            out,
            "\n{}\n  Starts:     {}\n  Ends:       {}\n  Candidates: {}\n  Status:     {}\n  Address:    {}\n",
            truncate(&poll.description, LIST_DESCRIPTION_LEN),
            format_timestamp(poll.start_ms),
            format_timestamp(poll.end_ms),
            poll.candidates,
            status_label(poll.status(ctx.now_ms)),
            poll.address,
        );
    }
    out
}

fn render_candidate(out: &mut String, candidate: &CandidateView, voted: bool, leader: Option<u64>) {
    let action = if voted { "Voted" } else { "Vote" };
    let marker = if leader == Some(candidate.cid) { " *" } else { "" };
    let _ = writeln!(
        out,
        "  #{:<4} {:<32} {} {}{}",
        candidate.cid, candidate.name, action, candidate.votes, marker
    );
}

/// Poll detail page; `voted` is `None` when no wallet is connected.
pub fn render_poll_detail(ctx: &RenderContext, detail: &PollDetail, voted: Option<bool>) -> String {
    let poll = &detail.poll;
    let mut out = String::new();

    let _ = write!(
        out,
        "Poll Details\n\n{}\n  Starts:     {}\n  Ends:       {}\n  Candidates: {}\n  Status:     {}\n  Poll id:    {}\n  Address:    {}\n\n",
        poll.description,
        format_timestamp(poll.start_ms),
        format_timestamp(poll.end_ms),
        poll.candidates,
        status_label(poll.status(ctx.now_ms)),
        poll.id,
        poll.address,
    );

    if detail.candidates.is_empty() {
        out.push_str("No candidates registered yet.\n");
    } else {
        let leader = detail.leader().map(|c| c.cid);
        out.push_str("Candidates\n");
        for candidate in &detail.candidates {
            render_candidate(&mut out, candidate, voted.unwrap_or(false), leader);
        }
        let _ = writeln!(out, "  Total votes: {}", detail.total_votes());
    }

    out.push('\n');
    out.push_str(match voted {
        Some(true) => "You have already voted in this poll.",
        Some(false) => "You have not voted in this poll yet.",
        None => "Connect a wallet to register candidates and vote.",
    });
    out
}
