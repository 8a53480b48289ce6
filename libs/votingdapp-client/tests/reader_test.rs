mod helpers;

use helpers::*;
use votingdapp_client::interface::{
    candidate_address, counter_address, poll_address, Candidate, Counter, Poll,
};
use votingdapp_client::{ClientError, NOT_INITIALIZED};

#[tokio::test]
async fn counter_is_sentinel_until_initialized() {
    let client = setup();
    assert_eq!(client.reader.fetch_counter().await, NOT_INITIALIZED);
    assert!(!client.reader.is_initialized().await);
    assert_eq!(client.reader.next_poll_id().await, None);

    client.chain.insert_account(
        counter_address(client.reader.program_id()),
        &Counter { count: 0 },
    );
    assert_eq!(client.reader.fetch_counter().await, 0);
    assert_eq!(client.reader.next_poll_id().await, Some(1));
}

#[tokio::test]
async fn counter_read_failure_reports_sentinel() {
    let client = setup();
    client.chain.insert_account(
        counter_address(client.reader.program_id()),
        &Counter { count: 9 },
    );
    client.chain.fail_reads(true);

    assert_eq!(client.reader.fetch_counter().await, NOT_INITIALIZED);
}

#[tokio::test]
async fn created_poll_reads_back_in_milliseconds() {
    let client = setup();
    client.submitter.initialize().await.unwrap();

    client
        .submitter
        .create_poll(1, "D", 1_700_000_000, 1_700_086_400)
        .await
        .unwrap();

    let poll = client.reader.fetch_poll(1).await.unwrap();
    assert_eq!(poll.id, 1);
    assert_eq!(poll.description, "D");
    assert_eq!(poll.start_ms, 1_700_000_000 * 1000);
    assert_eq!(poll.end_ms, 1_700_086_400 * 1000);
    assert_eq!(poll.candidates, 0);
    assert_eq!(poll.address, poll_address(client.reader.program_id(), 1));
}

#[tokio::test]
async fn missing_poll_is_an_error() {
    let client = setup();
    let err = client.reader.fetch_poll(7).await.unwrap_err();
    assert!(matches!(err, ClientError::AccountNotFound(address)
        if address == poll_address(client.reader.program_id(), 7)));
}

#[tokio::test]
async fn all_polls_are_listed() {
    let client = setup();
    with_polls(&client, &["first", "second", "third"]).await;

    let mut ids: Vec<u64> = client
        .reader
        .fetch_all_polls()
        .await
        .into_iter()
        .map(|poll| poll.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn poll_list_read_failure_is_empty() {
    let client = setup();
    with_polls(&client, &["first"]).await;
    client.chain.fail_reads(true);

    assert!(client.reader.fetch_all_polls().await.is_empty());
}

#[tokio::test]
async fn candidates_are_filtered_by_poll() {
    let client = setup();
    let program_id = *client.reader.program_id();
    let store = |poll_id: u64, cid: u64, name: &str| {
        client.chain.insert_account(
            candidate_address(&program_id, poll_id, cid),
            &Candidate {
                cid,
                poll_id,
                name: name.to_string(),
                votes: 0,
            },
        );
    };
    store(1, 1, "Ada");
    store(2, 2, "Grace");
    store(1, 3, "Edsger");

    let mut names: Vec<String> = client
        .reader
        .fetch_candidates_for_poll(1)
        .await
        .into_iter()
        .map(|candidate| {
            assert_eq!(candidate.poll_id, 1);
            candidate.name
        })
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ada", "Edsger"]);
    assert!(client.reader.fetch_candidates_for_poll(3).await.is_empty());
}

#[tokio::test]
async fn undecodable_accounts_are_skipped() {
    let client = setup();
    with_polls(&client, &["kept"]).await;

    // right discriminator, truncated body
    let mut data = Vec::new();
    anchor_lang::AccountSerialize::try_serialize(
        &Poll {
            id: 99,
            description: "broken".to_string(),
            start: 0,
            end: 1,
            candidates: 0,
        },
        &mut data,
    )
    .unwrap();
    data.truncate(12);
    client
        .chain
        .insert_raw(poll_address(client.reader.program_id(), 99), data);

    let polls = client.reader.fetch_all_polls().await;
    assert_eq!(polls.len(), 1);
    assert_eq!(polls[0].description, "kept");
}

#[tokio::test]
async fn poll_detail_is_one_snapshot() {
    let client = setup();
    with_polls(&client, &["first", "second"]).await;
    client.submitter.register_candidate(2, "Ada").await.unwrap();
    client.submitter.register_candidate(1, "Grace").await.unwrap();
    client.submitter.register_candidate(2, "Barbara").await.unwrap();

    let address = poll_address(client.reader.program_id(), 2);
    let detail = client.reader.fetch_poll_detail(&address).await.unwrap();

    assert_eq!(detail.poll.id, 2);
    assert_eq!(detail.poll.candidates, 2);
    let names: Vec<&str> = detail.candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Barbara"]);
}

// Read errors are indistinguishable from "never voted"; pinned here until
// the product decides whether the two should be told apart.
#[tokio::test]
async fn has_voted_fails_open_on_read_errors() {
    let client = setup();
    with_polls(&client, &["poll"]).await;
    let registration = client.submitter.register_candidate(1, "Ada").await.unwrap();
    client.submitter.vote(1, registration.cid).await.unwrap();
    assert!(client.reader.has_voted(1, &client.user).await);

    client.chain.fail_reads(true);
    assert!(!client.reader.has_voted(1, &client.user).await);
}
