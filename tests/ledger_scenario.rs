use std::thread;

use pow_ledger::{
    Address, Blockchain, LedgerConfig, MiningOutcome, Node, Transaction, TransactionError,
    Wallet,
};

fn register(node: &Node, name: &str, balance: f64) -> Address {
    let wallet = Wallet::with_balance(name, balance);
    let address = wallet.address().clone();
    node.add_wallet(wallet);
    address
}

fn balance_of(node: &Node, address: &Address) -> f64 {
    node.inspect(|ledger| ledger.wallet(address).map(Wallet::balance))
        .expect("wallet is registered")
}

#[test]
fn four_wallet_scenario() {
    let node = Node::new(Blockchain::new());

    let alice = register(&node, "Alice", 100.0);
    let bob = register(&node, "Bob", 50.0);
    let charlie = register(&node, "Charlie", 30.0);
    let dave = register(&node, "Dave", 20.0);

    let accepted = [
        Transaction::new(alice.clone(), bob.clone(), 50.0),
        Transaction::new(bob.clone(), charlie.clone(), 25.0),
        Transaction::new(charlie.clone(), dave.clone(), 10.0),
        Transaction::new(dave.clone(), alice.clone(), 15.0),
    ];
    for tx in &accepted {
        node.create_transaction(tx.sender.clone(), tx.receiver.clone(), tx.amount)
            .unwrap();
    }

    // Charlie's incoming 25 has not settled, so only 30 is available
    let rejected = node.create_transaction(charlie.clone(), alice.clone(), 50.0);
    assert_eq!(
        rejected,
        Err(TransactionError::InsufficientFunds {
            required: 50.0,
            available: 30.0
        })
    );
    assert_eq!(node.pending_transactions().len(), 4);

    let outcome = node.mine_pending_transactions().unwrap();
    let block = outcome.block().expect("a block was mined");
    assert_eq!(block.index, 1);
    assert_eq!(block.transactions(), accepted.as_slice());
    assert!(block.hash().starts_with("0000"));

    let chain = node.chain();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1].previous_hash, chain[0].hash());
    assert!(node.pending_transactions().is_empty());
    assert!(node.is_chain_valid());

    assert_eq!(balance_of(&node, &alice), 65.0);
    assert_eq!(balance_of(&node, &bob), 75.0);
    assert_eq!(balance_of(&node, &charlie), 45.0);
    assert_eq!(balance_of(&node, &dave), 15.0);
    assert_eq!(node.inspect(|ledger| ledger.total_balance()), 200.0);
}

#[test]
fn mining_empty_queue_leaves_chain_unchanged() {
    let node = Node::new(Blockchain::new());
    let before = node.chain();

    let outcome = node.mine_pending_transactions().unwrap();

    assert!(matches!(outcome, MiningOutcome::NothingToMine));
    let after = node.chain();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].hash(), before[0].hash());
}

#[test]
fn wallets_enumerate_in_registration_order() {
    let node = Node::new(Blockchain::new());
    for name in ["Alice", "Bob", "Charlie", "Dave"] {
        register(&node, name, 1.0);
    }

    let names: Vec<String> = node.wallets().into_iter().map(|w| w.username).collect();

    assert_eq!(names, ["Alice", "Bob", "Charlie", "Dave"]);
}

#[test]
fn concurrent_submissions_settle_in_one_block() {
    let config = LedgerConfig::default().with_difficulty(2);
    let node = Node::new(Blockchain::with_config(config).unwrap());
    let treasury = register(&node, "Treasury", 1_000.0);
    let receivers: Vec<Address> = (0..8)
        .map(|i| register(&node, &format!("user-{i}"), 0.0))
        .collect();

    let handles: Vec<_> = receivers
        .iter()
        .cloned()
        .map(|receiver| {
            let node = node.clone();
            let sender = treasury.clone();
            thread::spawn(move || node.create_transaction(sender, receiver, 10.0))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    node.mine_pending_transactions().unwrap();

    assert_eq!(node.chain().len(), 2);
    assert_eq!(node.chain()[1].transactions().len(), 8);
    assert_eq!(balance_of(&node, &treasury), 920.0);
    for receiver in &receivers {
        assert_eq!(balance_of(&node, receiver), 10.0);
    }
    assert!(node.is_chain_valid());
}
