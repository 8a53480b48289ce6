#![allow(dead_code)]

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use votingdapp_client::mock::MockChain;
use votingdapp_client::{AccountReader, TransactionSubmitter, Wallet};

pub const FUNDED: u64 = 2_000_000_000;

pub struct TestClient {
    pub chain: Arc<MockChain>,
    pub reader: AccountReader<MockChain>,
    pub submitter: TransactionSubmitter<MockChain>,
    pub user: Pubkey,
}

/// A funded wallet talking to an empty ledger.
pub fn setup() -> TestClient {
    let program_id = votingdapp_client::interface::ID;
    let chain = Arc::new(MockChain::new(program_id));
    let wallet = Keypair::new();
    let user = wallet.pubkey();
    chain.set_balance(user, FUNDED);

    let wallet: Arc<dyn Wallet> = Arc::new(wallet);
    TestClient {
        reader: AccountReader::new(Arc::clone(&chain), program_id),
        submitter: TransactionSubmitter::new(Arc::clone(&chain), program_id, Some(wallet)),
        chain,
        user,
    }
}

/// A second wallet acting on the same ledger.
pub fn other_user(client: &TestClient) -> (TransactionSubmitter<MockChain>, Pubkey) {
    let wallet = Keypair::new();
    let user = wallet.pubkey();
    client.chain.set_balance(user, FUNDED);
    let wallet: Arc<dyn Wallet> = Arc::new(wallet);
    (
        TransactionSubmitter::new(
            Arc::clone(&client.chain),
            *client.reader.program_id(),
            Some(wallet),
        ),
        user,
    )
}

/// Initializes the program and creates one poll per description.
pub async fn with_polls(client: &TestClient, descriptions: &[&str]) {
    client.submitter.initialize().await.unwrap();
    for description in descriptions {
        let next_id = client.reader.next_poll_id().await.unwrap();
        client
            .submitter
            .create_poll(next_id, description, 1_700_000_000, 1_700_086_400)
            .await
            .unwrap();
    }
}
