mod support;

use serde_json::{Value, json};
use support::ws;

// Two clients queue, get paired, and the opener claims row 0 for the win.
#[tokio::test]
async fn matched_pair_plays_to_a_win() {
    let base_url = support::ensure_server();
    let (mut a, id_a) = ws::connect(base_url).await;
    let (mut b, id_b) = ws::connect(base_url).await;

    ws::find_match(&mut a).await;
    let waiting = ws::next_snapshot(&mut a).await;
    assert_eq!(waiting["status"], "Searching for players");
    assert_eq!(waiting["participants"].as_array().map(Vec::len), Some(1));

    ws::find_match(&mut b).await;
    let started_a = ws::next_snapshot(&mut a).await;
    let started_b = ws::next_snapshot(&mut b).await;
    assert_eq!(started_a, started_b);
    assert_eq!(started_a["status"], "Game in progress");
    assert_eq!(started_a["participants"].as_array().map(Vec::len), Some(2));

    let session_id = started_a["id"].as_str().expect("session id").to_string();
    let opener = started_a["turn"].as_str().expect("opening turn").to_string();
    assert!(opener == id_a || opener == id_b);
    let opener_marker = started_a["participants"]
        .as_array()
        .expect("participants")
        .iter()
        .find(|p| p["id"] == opener.as_str())
        .expect("opener seated")["marker"]
        .as_str()
        .expect("marker label")
        .to_string();

    // Opener takes row 0 across three turns; the opponent answers in row 1.
    let follower = if opener == id_a { id_b.clone() } else { id_a.clone() };
    let script = [
        (opener.clone(), 0, 0),
        (follower.clone(), 1, 0),
        (opener.clone(), 0, 1),
        (follower.clone(), 1, 1),
        (opener.clone(), 0, 2),
    ];

    let mut last = Value::Null;
    for (mover, row, col) in script {
        let client = if mover == id_a { &mut a } else { &mut b };
        ws::submit_move(client, &session_id, row, col).await;
        // Each successful move reaches both clients exactly once.
        let snap_a = ws::next_snapshot(&mut a).await;
        let snap_b = ws::next_snapshot(&mut b).await;
        assert_eq!(snap_a, snap_b);
        last = snap_a;
    }

    assert_eq!(last["status"], "Game finished");
    assert_eq!(last["winner"], opener.as_str());
    assert_eq!(
        last["board"][0],
        json!([&opener_marker, &opener_marker, &opener_marker])
    );
}
