use senet_client::{
    InMemoryLink, ReceiverTask, SenetClient, SessionPhase, WaitLimits, WaitOutcome,
};
use tokio::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_returns_cancelled_and_writes_nothing() {
    // a link that never delivers anything: the wait spins on deadline misses
    let task = ReceiverTask::spawn(
        InMemoryLink::new(),
        SessionPhase::InGame,
        WaitLimits::UNBOUNDED,
        |m| m.is_start_turn(),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    task.cancel();

    let (link, result) = task.join().await;
    assert!(matches!(result, Ok(WaitOutcome::Cancelled)));
    assert!(link.sent().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_before_the_first_read_still_wins() {
    let task = ReceiverTask::spawn(
        InMemoryLink::new().feed(b"INFOK"),
        SessionPhase::PreGame,
        WaitLimits::UNBOUNDED,
        |m| m.is_ok(),
    );
    task.cancel();

    let (_, result) = task.join().await;
    // either the flag was seen before the decode (Cancelled) or the message
    // squeaked through first; both are valid, an error is not
    match result.unwrap() {
        WaitOutcome::Cancelled | WaitOutcome::Message(_) => {}
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_observation_hands_the_client_back() {
    let client = SenetClient::new(InMemoryLink::new());
    let observation = client.observe_until(|m| m.is_start_turn());

    tokio::time::sleep(Duration::from_millis(50)).await;
    observation.cancel();

    let (client, result) = observation.join().await;
    assert!(matches!(result, Ok(WaitOutcome::Cancelled)));
    assert!(client.into_link().sent().is_empty());
}
