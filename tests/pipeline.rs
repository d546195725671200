use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fanpipe::error::{Error, Result};
use fanpipe::pipeline::cancel::CancelToken;
use fanpipe::pipeline::chain::PipeExt;
use fanpipe::pipeline::pipe::Pipe;
use fanpipe::pipeline::runtime::Runtime;
use tokio::sync::mpsc::{Receiver, Sender};

mod common;
use common::{CollectSink, VecSource};

struct FailPipe;

#[async_trait]
impl Pipe<u32, u32> for FailPipe {
    async fn process(
        &self,
        mut input: Receiver<u32>,
        _output: Sender<u32>,
        _buffer: usize,
        cancel: CancelToken,
    ) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => Ok(()),
            msg = input.recv() => {
                if msg.is_some() {
                    Err(Error::Pipeline { context: "boom" })
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[tokio::test]
async fn chain_passes_items_through() -> Result<()> {
    let collected = Arc::new(Mutex::new(Vec::<u32>::new()));
    let sink = CollectSink::new(collected.clone());

    let pipe = VecSource::new(vec![1, 2, 3, 4]).pipe::<(), _>(sink);

    let rt = Runtime::new().buffer(16);
    let (tx, _rx, _cancel, handle) = rt.spawn(pipe);

    tx.send(()).await.unwrap();
    drop(tx);

    handle.await??;

    assert_eq!(&*collected.lock().unwrap(), &[1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn chain_propagates_error() {
    // the source emits one u32 and FailPipe fails on it
    let pipe = VecSource::new(vec![10u32]).pipe::<u32, _>(FailPipe);

    let rt = Runtime::new().buffer(16);
    let (tx, _rx, _cancel, handle) = rt.spawn(pipe);

    tx.send(()).await.unwrap();
    drop(tx);

    let err = handle.await.unwrap().unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("boom"));
}

#[tokio::test]
async fn multi_stage_chain_works() -> Result<()> {
    struct LenPipe;

    #[async_trait]
    impl Pipe<Vec<u8>, u32> for LenPipe {
        async fn process(
            &self,
            mut input: Receiver<Vec<u8>>,
            output: Sender<u32>,
            _buffer: usize,
            cancel: CancelToken,
        ) -> Result<()> {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    msg = input.recv() => {
                        let Some(v) = msg else { break; };
                        if output.send(v.len() as u32).await.is_err() {
                            break;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    let collected = Arc::new(Mutex::new(Vec::<u32>::new()));
    let sink = CollectSink::new(collected.clone());

    let pipe = VecSource::new(vec![vec![1, 2], vec![3, 4, 5], vec![]])
        .pipe::<u32, _>(LenPipe)
        .pipe::<(), _>(sink);

    let rt = Runtime::new().buffer(8);
    let (tx, _rx, _cancel, handle) = rt.spawn(pipe);

    tx.send(()).await.unwrap();
    drop(tx);

    handle.await??;

    assert_eq!(&*collected.lock().unwrap(), &[2, 3, 0]);
    Ok(())
}

#[tokio::test]
async fn attach_runs_a_stage_under_a_caller_token() -> Result<()> {
    let rt = Runtime::new().buffer(8);
    let cancel = CancelToken::default();

    let (src_rx, src_handle) = rt.source(&cancel, VecSource::new(vec![5u32, 6, 7]));
    let (mut out_rx, map_handle) =
        rt.attach(&cancel, src_rx, fanpipe::pipeline::adapters::MapPipe(|v: u32| v + 1));

    let mut got = Vec::new();
    while let Some(v) = out_rx.recv().await {
        got.push(v);
    }

    src_handle.await??;
    map_handle.await??;
    assert_eq!(got, vec![6, 7, 8]);
    Ok(())
}
