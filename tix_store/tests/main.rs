use aok::{OK, Void};
use log::info;
use tix_store::{Reply, StoreError};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_reply_accessors() -> Void {
  assert_eq!(Reply::Int(3).int()?, 3);
  assert_eq!(Reply::Items(vec!["a".into()]).items()?, vec!["a".to_string()]);

  let (cursor, items) = Reply::Scan {
    cursor: 0,
    items: vec![],
  }
  .scan()?;
  assert_eq!(cursor, 0);
  assert!(items.is_empty());

  info!("reply accessors ok");
  OK
}

#[test]
fn test_reply_mismatch() -> Void {
  let err = Reply::Items(vec![]).int().unwrap_err();
  match err {
    StoreError::WrongReply { expect, got } => {
      assert_eq!(expect, "int");
      assert_eq!(got, "items");
    }
    other => panic!("unexpected: {other}"),
  }
  OK
}
