// # Sample Handoff
//
// Rendezvous between the poll task and the consumer. Each sample travels
// with a oneshot acknowledgement; the poll task does not continue until the
// consumer has taken the sample. A sample whose producer already gave up
// (stop, drop) is discarded on the consumer side, so nothing surfaces after
// `LinkStatusMonitor::stop()` returns.

use super::sample::LinkStatusSample;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

pub(crate) type Handoff = (LinkStatusSample, oneshot::Sender<()>);

pub(crate) fn channel() -> (mpsc::Sender<Handoff>, SampleReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (tx, SampleReceiver { rx })
}

/// Receiving end of a monitor's samples
#[derive(Debug)]
pub struct SampleReceiver {
    rx: mpsc::Receiver<Handoff>,
}

impl SampleReceiver {
    /// Wait for the next sample
    ///
    /// Returns `None` once the monitor has stopped and every accepted
    /// sample has been handed over.
    pub async fn recv(&mut self) -> Option<LinkStatusSample> {
        loop {
            let (sample, ack) = self.rx.recv().await?;
            if ack.send(()).is_ok() {
                return Some(sample);
            }
        }
    }

    /// Consume the receiver as a stream of samples
    pub fn into_stream(self) -> impl Stream<Item = LinkStatusSample> + Unpin {
        ReceiverStream::new(self.rx).filter_map(|(sample, ack)| ack.send(()).ok().map(|_| sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LinkStatusSample {
        LinkStatusSample::new(std::iter::empty())
    }

    #[tokio::test]
    async fn accepted_sample_is_acknowledged() {
        let (tx, mut rx) = channel();
        let (ack_tx, ack_rx) = oneshot::channel();

        tx.send((sample(), ack_tx)).await.unwrap();
        assert!(rx.recv().await.is_some());
        assert!(ack_rx.await.is_ok());
    }

    #[tokio::test]
    async fn abandoned_sample_is_discarded() {
        let (tx, mut rx) = channel();
        let (ack_tx, ack_rx) = oneshot::channel();

        tx.send((sample(), ack_tx)).await.unwrap();
        drop(ack_rx);
        drop(tx);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stream_skips_abandoned_samples() {
        let (tx, rx) = channel();

        let producer = tokio::spawn(async move {
            let (stale_tx, stale_rx) = oneshot::channel();
            tx.send((sample(), stale_tx)).await.unwrap();
            drop(stale_rx);

            let (live_tx, live_rx) = oneshot::channel();
            tx.send((sample(), live_tx)).await.unwrap();
            live_rx.await.is_ok()
        });

        let mut samples = rx.into_stream();
        assert!(samples.next().await.is_some());
        assert!(producer.await.unwrap(), "live sample acknowledged");
        assert!(samples.next().await.is_none());
    }
}
