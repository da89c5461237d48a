use alloy_primitives::{Address, U256};
use swapper::domain::ports::{StateStoreBox, TokenLedgerBox};
use swapper::domain::snapshot::{AccountRecord, Checkpoint, Deployment, HostSnapshot};
use swapper::infrastructure::in_memory::InMemoryStateStore;
use swapper::infrastructure::token::Erc20Ledger;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let store: StateStoreBox = Box::new(InMemoryStateStore::new());
    let holder = Address::repeat_byte(0x22);
    let mut ledger: TokenLedgerBox = Box::new(Erc20Ledger::with_supply(
        "DEXE",
        18,
        holder,
        U256::from(100u64),
    ));

    let checkpoint = Checkpoint {
        deployment: Deployment {
            deployer: Address::repeat_byte(0x11),
            token: Address::repeat_byte(0x70),
            implementation: Address::repeat_byte(0x80),
            proxy: Address::repeat_byte(0x90),
        },
        host: HostSnapshot {
            accounts: vec![AccountRecord {
                address: holder,
                native: U256::from(7u64),
                nonce: 0,
            }],
            ..Default::default()
        },
    };
    let expected = checkpoint.clone();

    // Verify Send + Sync by spawning tasks
    let store_handle = tokio::spawn(async move {
        store.save(checkpoint).await.unwrap();
        store.load().await.unwrap().unwrap()
    });

    let ledger_handle = tokio::spawn(async move {
        ledger
            .transfer(holder, Address::repeat_byte(0x33), U256::from(40u64))
            .unwrap();
        ledger.record(Address::repeat_byte(0x70))
    });

    assert_eq!(store_handle.await.unwrap(), expected);

    let record = ledger_handle.await.unwrap();
    assert_eq!(record.symbol, "DEXE");
    assert!(record.balances.contains(&(holder, U256::from(60u64))));
}
