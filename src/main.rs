use anyhow::Context;
use log::info;

use pow_ledger::{Blockchain, LedgerConfig, Node, Wallet};

// Load the configuration from an optional JSON file, then the environment
fn load_config() -> anyhow::Result<LedgerConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => LedgerConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => LedgerConfig::default(),
    };

    Ok(config.apply_env()?)
}

fn print_report(node: &Node) {
    println!("\nBlockchain valid? {}", node.is_chain_valid());

    for block in node.chain() {
        let transactions = if block.payload.is_genesis() {
            "Genesis Block".to_string()
        } else {
            block
                .transactions()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!("\nIndex: {}", block.index);
        println!("Transactions: [{}]", transactions);
        println!("Timestamp: {}", block.timestamp);
        println!("Previous Hash: {}", block.previous_hash);
        println!("Hash: {}", block.hash());
        println!("Nonce: {}", block.nonce);
    }

    println!("\nBalances:");
    for wallet in node.wallets() {
        println!("{} ({}): {}", wallet.username, wallet.address(), wallet.balance());
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = load_config()?;
    info!(
        "Starting ledger with difficulty {} and {:?} admission",
        config.difficulty, config.admission
    );
    let node = Node::new(Blockchain::with_config(config)?);

    let alice = Wallet::with_balance("Alice", 100.0);
    let bob = Wallet::with_balance("Bob", 50.0);
    let charlie = Wallet::with_balance("Charlie", 30.0);
    let dave = Wallet::with_balance("Dave", 20.0);

    let (a, b, c, d) = (
        alice.address().clone(),
        bob.address().clone(),
        charlie.address().clone(),
        dave.address().clone(),
    );

    for wallet in [alice, bob, charlie, dave] {
        node.add_wallet(wallet);
    }

    let transfers = [
        (&a, &b, 50.0),
        (&b, &c, 25.0),
        (&c, &d, 10.0),
        (&d, &a, 15.0),
        // Charlie only has 30 committed
        (&c, &a, 50.0),
    ];
    for (sender, receiver, amount) in transfers {
        if let Err(err) = node.create_transaction(sender.clone(), receiver.clone(), amount) {
            println!("Transaction rejected: {}", err);
        }
    }

    println!("Mining pending transactions...");
    node.mine_pending_transactions()?;

    print_report(&node);

    Ok(())
}
