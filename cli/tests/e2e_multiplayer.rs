// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test: two sessions over loopback, scripted moves, both
//! boards kept identical.

use std::time::Duration;

use checkers_cli::session::{GameMode, GameSession};
use checkers_core::{Board, Color, MoveRecord};
use checkers_network::{NetworkChannel, NetworkStatus};

/// Sorted snapshot of the live pieces, for board equality.
fn snapshot(board: &Board) -> Vec<(i32, i32, char, bool)> {
    let mut pieces: Vec<_> = board
        .live_pieces()
        .map(|p| {
            let color = match p.color() {
                Color::White => 'W',
                Color::Black => 'B',
            };
            (p.row(), p.col(), color, p.is_king())
        })
        .collect();
    pieces.sort();
    pieces
}

async fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn connected_pair() -> (NetworkChannel, NetworkChannel) {
    let mut host = NetworkChannel::new();
    assert!(host.host_game(0).await);
    let port = host.local_addr().expect("bound address").port();

    let mut client = NetworkChannel::new();
    assert!(client.connect_to_game("127.0.0.1", port).await);
    wait_for("host to accept", || host.status() == NetworkStatus::Connected).await;
    (host, client)
}

/// Play one locally-clicked move and relay it to the peer session.
async fn relay_clicks(
    mover: &mut GameSession,
    mover_channel: &NetworkChannel,
    receiver: &mut GameSession,
    receiver_channel: &NetworkChannel,
    select: (i32, i32),
    dest: (i32, i32),
) {
    mover.click(select.0, select.1);
    let result = mover.click(dest.0, dest.1);
    assert!(result.moved, "click {select:?} -> {dest:?} did not move");

    let record = mover.last_move().expect("a move was recorded");
    assert!(
        mover_channel
            .send_move(
                record.from_row,
                record.from_col,
                record.to_row,
                record.to_col
            )
            .await
    );

    wait_for("the move to arrive", || receiver_channel.has_received_move()).await;
    let received = receiver_channel.take_received_move();
    assert_eq!(received, record);
    assert!(receiver.apply_remote_move(received));
}

#[tokio::test]
async fn scripted_opening_keeps_boards_identical() {
    let (mut host_channel, mut client_channel) = connected_pair().await;
    let mut host = GameSession::new(GameMode::NetworkHost);
    let mut client = GameSession::new(GameMode::NetworkClient);

    assert_eq!(snapshot(host.board()), snapshot(client.board()));
    assert!(host.my_turn());
    assert!(!client.my_turn());

    // White (host) plays (5,0) -> (4,1)
    relay_clicks(
        &mut host,
        &host_channel,
        &mut client,
        &client_channel,
        (5, 0),
        (4, 1),
    )
    .await;
    assert_eq!(snapshot(host.board()), snapshot(client.board()));
    assert!(!host.my_turn());
    assert!(client.my_turn());
    assert_eq!(client.current_player(), Color::Black);

    // Black (client) plays (2,1) -> (3,0)
    relay_clicks(
        &mut client,
        &client_channel,
        &mut host,
        &host_channel,
        (2, 1),
        (3, 0),
    )
    .await;
    assert_eq!(snapshot(host.board()), snapshot(client.board()));
    assert!(host.my_turn());
    assert_eq!(host.current_player(), Color::White);

    // Two quiet opening moves: no captures, no kings
    assert_eq!(host.board().live_count(Color::White), 12);
    assert_eq!(host.board().live_count(Color::Black), 12);

    host_channel.disconnect().await;
    client_channel.disconnect().await;
}

#[tokio::test]
async fn capture_chain_relays_segment_by_segment() {
    let (mut host_channel, mut client_channel) = connected_pair().await;

    let mut position = Board::empty();
    position.place_piece(5, 2, Color::White, false).unwrap();
    position.place_piece(4, 3, Color::Black, false).unwrap();
    position.place_piece(2, 5, Color::Black, false).unwrap();
    position.place_piece(0, 1, Color::Black, false).unwrap();

    let mut host = GameSession::with_board(position.clone(), GameMode::NetworkHost);
    let mut client = GameSession::with_board(position, GameMode::NetworkClient);

    // First jump: the chain keeps the turn with the host.
    host.click(5, 2);
    let first = host.click(3, 4);
    assert!(first.moved && first.captured && first.can_chain);
    assert!(host.my_turn());
    let record = host.last_move().unwrap();
    assert_eq!(record, MoveRecord::new(5, 2, 3, 4));
    assert!(
        host_channel
            .send_move(
                record.from_row,
                record.from_col,
                record.to_row,
                record.to_col
            )
            .await
    );

    wait_for("first segment", || client_channel.has_received_move()).await;
    assert!(client.apply_remote_move(client_channel.take_received_move()));
    assert!(!client.my_turn(), "chain segment must not pass the turn");

    // Second jump finishes the chain and passes the turn.
    let second = host.click(1, 6);
    assert!(second.moved && second.captured && !second.can_chain);
    assert!(!host.my_turn());
    let record = host.last_move().unwrap();
    assert!(
        host_channel
            .send_move(
                record.from_row,
                record.from_col,
                record.to_row,
                record.to_col
            )
            .await
    );

    wait_for("second segment", || client_channel.has_received_move()).await;
    assert!(client.apply_remote_move(client_channel.take_received_move()));
    assert!(client.my_turn());
    assert_eq!(client.current_player(), Color::Black);

    assert_eq!(snapshot(host.board()), snapshot(client.board()));
    assert_eq!(host.board().live_count(Color::Black), 1);

    host_channel.disconnect().await;
    client_channel.disconnect().await;
}
