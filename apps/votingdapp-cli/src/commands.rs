use std::str::FromStr;

use anyhow::{bail, Context};
use solana_sdk::pubkey::Pubkey;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use votingdapp_client::interface::poll_address;
use votingdapp_client::{AccountReader, ChainClient, TransactionSubmitter};

use crate::cli::Command;
use crate::render::{render_poll_detail, render_poll_list, RenderContext};

/// Runs one command and returns what to print.
///
/// Every write is followed by a fresh read of the view it affects.
pub struct App<C> {
    submitter: TransactionSubmitter<C>,
}

/// Unix seconds from either a plain integer or an RFC 3339 date-time.
pub fn parse_timestamp(input: &str) -> anyhow::Result<u64> {
    let input = input.trim();
    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(seconds);
    }
    let datetime = OffsetDateTime::parse(input, &Rfc3339)
        .with_context(|| format!("Invalid date-time: {input}"))?;
    u64::try_from(datetime.unix_timestamp())
        .with_context(|| format!("Date-time before 1970: {input}"))
}

pub fn now_ms() -> u64 {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
}

impl<C: ChainClient> App<C> {
    pub fn new(submitter: TransactionSubmitter<C>) -> Self {
        Self { submitter }
    }

    fn reader(&self) -> &AccountReader<C> {
        self.submitter.reader()
    }

    async fn context(&self, now_ms: u64) -> RenderContext {
        RenderContext {
            wallet: self.submitter.identity(),
            initialized: self.reader().is_initialized().await,
            now_ms,
        }
    }

    async fn poll_page(&self, address: &Pubkey, now_ms: u64) -> anyhow::Result<String> {
        let detail = self
            .reader()
            .fetch_poll_detail(address)
            .await
            .context("Unable to load poll")?;
        let voted = match self.submitter.identity() {
            Some(user) => Some(self.reader().has_voted(detail.poll.id, &user).await),
            None => None,
        };
        let ctx = self.context(now_ms).await;
        Ok(render_poll_detail(&ctx, &detail, voted))
    }

    async fn poll_list(&self, now_ms: u64) -> String {
        let polls = self.reader().fetch_all_polls().await;
        let ctx = self.context(now_ms).await;
        render_poll_list(&ctx, &polls)
    }

    pub async fn run(&self, command: &Command, now_ms: u64) -> anyhow::Result<String> {
        let program_id = *self.reader().program_id();

        match command {
            Command::Polls => Ok(self.poll_list(now_ms).await),
            Command::Poll { address } => {
                let address = Pubkey::from_str(address)
                    .with_context(|| format!("Invalid poll address: {address}"))?;
                self.poll_page(&address, now_ms).await
            }
            Command::Counter => Ok(self.reader().fetch_counter().await.to_string()),
            Command::Init => {
                let signature = self.submitter.initialize().await?;
                Ok(format!(
                    "Initialization successful: {signature}\n\n{}",
                    self.poll_list(now_ms).await
                ))
            }
            Command::CreatePoll {
                description,
                start,
                end,
            } => {
                let start = parse_timestamp(start)?;
                let end = parse_timestamp(end)?;
                let Some(next_id) = self.reader().next_poll_id().await else {
                    bail!("The program is not initialized yet. Run `votingdapp init` first.");
                };
                let signature = self
                    .submitter
                    .create_poll(next_id, description, start, end)
                    .await?;
                let page = self
                    .poll_page(&poll_address(&program_id, next_id), now_ms)
                    .await?;
                Ok(format!("Poll {next_id} created: {signature}\n\n{page}"))
            }
            Command::Register { poll_id, name } => {
                let registration = self.submitter.register_candidate(*poll_id, name).await?;
                let page = self
                    .poll_page(&poll_address(&program_id, *poll_id), now_ms)
                    .await?;
                Ok(format!(
                    "Candidate #{} registered: {}\n\n{page}",
                    registration.cid, registration.signature
                ))
            }
            Command::Vote { poll_id, cid } => {
                if let Some(user) = self.submitter.identity() {
                    if self.reader().has_voted(*poll_id, &user).await {
                        bail!("You have already voted in this poll.");
                    }
                }
                let signature = self.submitter.vote(*poll_id, *cid).await?;
                let page = self
                    .poll_page(&poll_address(&program_id, *poll_id), now_ms)
                    .await?;
                Ok(format!("Vote cast: {signature}\n\n{page}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use solana_sdk::signature::{Keypair, Signer};
    use votingdapp_client::interface::ID;
    use votingdapp_client::mock::MockChain;
    use votingdapp_client::{ClientError, Wallet};

    use super::*;

    const NOW_MS: u64 = 1_700_000_500_000;

    fn app(with_wallet: bool) -> (App<MockChain>, Arc<MockChain>) {
        let chain = Arc::new(MockChain::new(ID));
        let wallet = with_wallet.then(|| {
            let keypair = Keypair::new();
            chain.set_balance(keypair.pubkey(), 1_000_000_000);
            Arc::new(keypair) as Arc<dyn Wallet>
        });
        let submitter = TransactionSubmitter::new(Arc::clone(&chain), ID, wallet);
        (App::new(submitter), chain)
    }

    fn create_poll(description: &str) -> Command {
        Command::CreatePoll {
            description: description.to_string(),
            start: "2023-11-14T22:13:20Z".to_string(),
            end: "1700086400".to_string(),
        }
    }

    #[test]
    fn timestamps_accept_seconds_and_rfc3339() {
        assert_eq!(parse_timestamp("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(
            parse_timestamp("2023-11-14T22:13:20Z").unwrap(),
            1_700_000_000
        );
        assert!(parse_timestamp("tomorrow").is_err());
        assert!(parse_timestamp("1969-12-31T23:59:59Z").is_err());
    }

    #[tokio::test]
    async fn create_poll_requires_initialization() {
        let (app, _) = app(true);
        let err = app.run(&create_poll("Lunch"), NOW_MS).await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[tokio::test]
    async fn full_flow_refreshes_views() {
        let (app, _) = app(true);

        let out = app.run(&Command::Init, NOW_MS).await.unwrap();
        assert!(out.starts_with("Initialization successful"));
        assert!(out.contains("be the first to create one!"));

        let out = app.run(&create_poll("Lunch"), NOW_MS).await.unwrap();
        assert!(out.starts_with("Poll 1 created"));
        assert!(out.contains("Starts:     2023-11-14 22:13:20 UTC"));

        let register = Command::Register {
            poll_id: 1,
            name: "Pizza".to_string(),
        };
        let out = app.run(&register, NOW_MS).await.unwrap();
        assert!(out.starts_with("Candidate #1 registered"));
        assert!(out.contains("Vote 0"));

        let out = app
            .run(&Command::Vote { poll_id: 1, cid: 1 }, NOW_MS)
            .await
            .unwrap();
        assert!(out.contains("Voted 1 *"));
        assert!(out.ends_with("You have already voted in this poll."));

        let again = app
            .run(&Command::Vote { poll_id: 1, cid: 1 }, NOW_MS)
            .await
            .unwrap_err();
        assert_eq!(again.to_string(), "You have already voted in this poll.");

        let list = app.run(&Command::Polls, NOW_MS).await.unwrap();
        assert!(list.contains("Lunch"));
        assert!(list.contains("Candidates: 1"));
        assert_eq!(app.run(&Command::Counter, NOW_MS).await.unwrap(), "1");
    }

    #[tokio::test]
    async fn read_only_session_lists_but_cannot_write() {
        let (app, _) = app(false);

        assert_eq!(app.run(&Command::Counter, NOW_MS).await.unwrap(), "-1");
        assert!(app
            .run(&Command::Polls, NOW_MS)
            .await
            .unwrap()
            .contains("please connect your wallet"));

        let err = app.run(&Command::Init, NOW_MS).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn unknown_poll_address_is_reported() {
        let (app, _) = app(false);
        let missing = Pubkey::new_unique().to_string();

        let err = app
            .run(&Command::Poll { address: missing }, NOW_MS)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unable to load poll");

        let err = app
            .run(
                &Command::Poll {
                    address: "nope".to_string(),
                },
                NOW_MS,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid poll address"));
    }

    #[tokio::test]
    async fn poll_page_shows_voting_state_for_the_wallet() {
        let (app, chain) = app(true);
        app.run(&Command::Init, NOW_MS).await.unwrap();
        app.run(&create_poll("Lunch"), NOW_MS).await.unwrap();

        let address = poll_address(&ID, 1).to_string();
        let out = app
            .run(&Command::Poll { address }, NOW_MS)
            .await
            .unwrap();
        assert!(out.contains("No candidates registered yet."));
        assert!(out.ends_with("You have not voted in this poll yet."));
        assert_eq!(chain.submit_attempts().len(), 2);
    }
}
