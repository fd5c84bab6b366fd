// tests/shell_tests.rs
// Scripted shell sessions over in-memory input.

mod util;

use decentralized_will::app::run_shell;
use decentralized_will::blockchain::simulated::ether;
use decentralized_will::blockchain::WillContract;
use decentralized_will::core::domain::checksum;
use ethers::types::U256;
use util::{Fixture, DAY};

#[tokio::test]
async fn test_session_create_advance_and_claim() {
    let f = Fixture::new();
    let (mut dashboard, _) = f.dashboard();
    let script = format!(
        "connect\nbeneficiary {}\nperiod {}\namount 2\ncreate\nadvance {}\nuse 1\nowner {}\nload\nclaim 1\nquit\n",
        checksum(&f.beneficiary()),
        DAY,
        DAY,
        checksum(&f.owner()),
    );
    let mut output = Vec::new();

    run_shell(&mut dashboard, Some(f.chain.clone()), script.as_bytes(), &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("[ok] Wallet connected!"), "{}", text);
    assert!(text.contains("[ok] Will created successfully!"), "{}", text);
    assert!(text.contains(&format!("clock advanced by {}s", DAY)), "{}", text);
    assert!(text.contains("[ok] Wallet changed!"), "{}", text);
    assert!(text.contains("* Claimable"), "{}", text);
    assert!(text.contains("[ok] Will claimed successfully!"), "{}", text);
    assert!(text.contains("Will #1"), "{}", text);

    assert!(dashboard.wills()[0].claimed);
    assert_eq!(f.chain.balance_of(f.beneficiary()), ether(102));
}

#[tokio::test]
async fn test_create_without_connect_keeps_success_alert() {
    let f = Fixture::new();
    let (mut dashboard, _) = f.dashboard();
    let script = format!(
        "beneficiary {}\nperiod {}\namount 1\ncreate\nquit\n",
        checksum(&f.beneficiary()),
        DAY,
    );
    let mut output = Vec::new();

    run_shell(&mut dashboard, Some(f.chain.clone()), script.as_bytes(), &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("[ok] Will created successfully!"), "{}", text);
    assert!(!text.contains("Wallet changed!"), "{}", text);
    let alert = dashboard.alert().unwrap();
    assert_eq!(alert.message, "Will created successfully!");
    assert_eq!(dashboard.account(), Some(f.owner()));
    assert_eq!(f.as_owner().get_all_wills(f.owner()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_after_disconnect_reauthorizes_quietly() {
    let f = Fixture::new();
    let (mut dashboard, _) = f.dashboard();
    let mut output = Vec::new();

    run_shell(&mut dashboard, Some(f.chain.clone()), &b"connect\ndisconnect\nload\nquit\n"[..], &mut output)
        .await
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("[error] Wallet disconnected."), "{}", text);
    assert!(dashboard.alert().is_none(), "{:?}", dashboard.alert());
    assert_eq!(dashboard.account(), Some(f.owner()));
}

#[tokio::test]
async fn test_session_reports_bad_commands_and_continues() {
    let f = Fixture::new();
    let (mut dashboard, _) = f.dashboard();
    let script = "dance\nclaim\nuse 7\nconnect\n";
    let mut output = Vec::new();

    run_shell(&mut dashboard, Some(f.chain.clone()), script.as_bytes(), &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error: Invalid input: unknown command 'dance'"), "{}", text);
    assert!(text.contains("usage: claim <id>"), "{}", text);
    assert!(text.contains("[ok] Wallet connected!"), "{}", text);
    assert_eq!(dashboard.account(), Some(f.owner()));
}

#[tokio::test]
async fn test_advance_requires_simulated_clock() {
    let f = Fixture::new();
    let (mut dashboard, _) = f.dashboard();
    let mut output = Vec::new();

    run_shell(&mut dashboard, None, &b"advance 60\nquit\n"[..], &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error: `advance` only works with --simulate"), "{}", text);
    assert_eq!(f.chain.timestamp(), util::GENESIS);
}

#[tokio::test]
async fn test_heartbeat_from_shell_resets_claimability() {
    let f = Fixture::new();
    f.as_owner().set_will(f.beneficiary(), U256::from(DAY), ether(1)).await.unwrap();
    let (mut dashboard, _) = f.dashboard();
    let script = format!("connect\nadvance {}\nload\nheartbeat 1\nquit\n", DAY);
    let mut output = Vec::new();

    run_shell(&mut dashboard, Some(f.chain.clone()), script.as_bytes(), &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("[ok] Heartbeat sent successfully!"), "{}", text);
    assert!(!dashboard.is_claimable(U256::one()));
}
