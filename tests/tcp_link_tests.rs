use senet_client::{decode, InboundMessage, Link, LinkError, RecvError, TcpLink};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread")]
async fn silent_peer_times_out_per_read() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        // hold the connection open without writing
        tokio::time::sleep(Duration::from_millis(500)).await;
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut link = TcpLink::with_deadline(stream, Duration::from_millis(100));

    let started = Instant::now();
    let result = link.recv_byte().await;
    assert!(matches!(result, Err(LinkError::TimedOut)));
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(started.elapsed() < Duration::from_millis(400));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_peer_reports_end_of_stream() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut link = TcpLink::connect(addr).await?;
    server_task.await?;

    let result = link.recv_byte().await;
    assert!(matches!(result, Err(LinkError::Closed)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn decodes_messages_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"iNfOk").await.unwrap();
        socket.write_all(b"CMD01030507090204060810").await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut link = TcpLink::connect(addr).await?;
    assert_eq!(decode(&mut link).await.unwrap(), InboundMessage::Ok);
    assert!(decode(&mut link).await.unwrap().is_start_turn());

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn truncated_message_then_close_is_fatal() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"INFSTART_GA").await.unwrap();
        socket.flush().await.unwrap();
        // close mid-message
    });

    let mut link = TcpLink::connect(addr).await?;
    let result = decode(&mut link).await;
    assert!(matches!(result, Err(RecvError::StreamClosed)));

    server_task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn read_deadline_can_be_adjusted() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_task = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut link = TcpLink::with_deadline(stream, Duration::from_millis(300));
    link.set_read_deadline(Duration::from_millis(50));
    assert_eq!(link.read_deadline(), Duration::from_millis(50));

    let started = Instant::now();
    assert!(matches!(link.recv_byte().await, Err(LinkError::TimedOut)));
    assert!(started.elapsed() < Duration::from_millis(250));

    server_task.await?;
    Ok(())
}
