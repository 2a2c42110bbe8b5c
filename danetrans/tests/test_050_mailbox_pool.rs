mod test_utils;

use danetrans::{PosixFrame, ReactorMailBox, ThreadPool, TransError, TransResult};
use log::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_050_mailbox_pool() -> TransResult<()> {
    let mut _log_handle = test_utils::init_logger();
    close_wakes_blocked_pop();
    bounded_inbound_makes_progress_on_pop()?;
    try_pop_distinguishes_empty_and_closed()?;
    outbound_push_for_unknown_connection_is_dropped()?;
    pool_runs_tasks_and_joins()?;
    info!("mailbox and pool tests passed");
    Ok(())
}

// Scenario "Stop under load", mailbox side: a blocked pop wakes with the
// closed branch as soon as the mailbox closes.
fn close_wakes_blocked_pop() {
    let mailbox = Arc::new(ReactorMailBox::new(8));
    let popper = {
        let mailbox = Arc::clone(&mailbox);
        std::thread::spawn(move || mailbox.pop_from_to_server_frame())
    };
    std::thread::sleep(Duration::from_millis(50));
    mailbox.close();
    let err = popper
        .join()
        .unwrap()
        .expect_err("pop should report the closed mailbox");
    assert!(err.is_branch());
    assert!(matches!(err, TransError::MailboxClosed));
    assert!(mailbox.is_closed());
}

// Property "Bounded-queue liveness": a producer blocked on the full inbound
// queue resumes as soon as a consumer pops, and order is preserved.
fn bounded_inbound_makes_progress_on_pop() -> TransResult<()> {
    let mailbox = Arc::new(ReactorMailBox::new(1));
    let producer = {
        let mailbox = Arc::clone(&mailbox);
        std::thread::spawn(move || -> TransResult<()> {
            for i in 0..5_u8 {
                // blocks whenever the queue is full
                mailbox.push_to_server_frame(PosixFrame::new(0, vec![i]))?;
            }
            Ok(())
        })
    };
    std::thread::sleep(Duration::from_millis(50));
    for i in 0..5_u8 {
        let frame = mailbox.pop_from_to_server_frame()?;
        assert_eq!(frame.payload, vec![i]);
        std::thread::sleep(Duration::from_millis(5));
    }
    producer.join().unwrap()?;
    Ok(())
}

fn try_pop_distinguishes_empty_and_closed() -> TransResult<()> {
    let mailbox = ReactorMailBox::new(4);
    assert!(mailbox.try_pop_from_to_server_queue()?.is_none());
    mailbox.close();
    assert!(matches!(
        mailbox.try_pop_from_to_server_queue(),
        Err(TransError::MailboxClosed)
    ));
    Ok(())
}

fn outbound_push_for_unknown_connection_is_dropped() -> TransResult<()> {
    let mailbox = ReactorMailBox::new(4);
    // no outbound queue exists for connection 42: the frame is dropped silently
    mailbox.push_to_client_frame(PosixFrame::new(42, vec![1, 2, 3]))?;
    Ok(())
}

fn pool_runs_tasks_and_joins() -> TransResult<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut pool = ThreadPool::new(3, 16)?;
    for _ in 0..100 {
        let counter = Arc::clone(&counter);
        pool.execute(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })?;
    }
    pool.stop();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
    assert!(matches!(
        pool.execute(|| {}),
        Err(TransError::MailboxClosed)
    ));
    Ok(())
}
