//! Rendezvous, payload transfer, and control-byte exchanges.

use bytes::{BufMut, BytesMut};
use deadbolt_core::{
    Candidate, PanelAction, Passcode, Verdict,
    constants::{PASS_SIZE, RECEIVER_READY, SENDER_READY},
};
use deadbolt_hardware::SerialLink;
use tracing::{debug, trace};

use crate::error::Result;

/// Rendezvous as the transferring side: announce readiness, then block
/// until the peer answers.
///
/// Bytes other than `RECEIVER_READY` seen while waiting are discarded.
///
/// # Errors
/// Fails only if the link itself fails; a silent peer blocks forever.
pub async fn rendezvous_as_sender<L: SerialLink>(link: &mut L) -> Result<()> {
    link.send_byte(SENDER_READY).await?;
    loop {
        let byte = link.recv_byte().await?;
        if byte == RECEIVER_READY {
            trace!("rendezvous complete (sender role)");
            return Ok(());
        }
        trace!(byte, "discarding stray byte during rendezvous");
    }
}

/// Rendezvous as the receiving side: block until the peer announces, then
/// answer.
///
/// # Errors
/// Fails only if the link itself fails; a silent peer blocks forever.
pub async fn rendezvous_as_receiver<L: SerialLink>(link: &mut L) -> Result<()> {
    loop {
        let byte = link.recv_byte().await?;
        if byte == SENDER_READY {
            break;
        }
        trace!(byte, "discarding stray byte during rendezvous");
    }
    link.send_byte(RECEIVER_READY).await?;
    trace!("rendezvous complete (receiver role)");
    Ok(())
}

/// Rendezvous, then transmit exactly `PASS_SIZE` payload bytes in order.
async fn send_payload<L: SerialLink>(link: &mut L, payload: &[u8; PASS_SIZE]) -> Result<()> {
    rendezvous_as_sender(link).await?;
    for &byte in payload {
        link.send_byte(byte).await?;
    }
    debug!("payload transferred");
    Ok(())
}

/// Rendezvous, then receive exactly `PASS_SIZE` payload bytes in order.
async fn recv_payload<L: SerialLink>(link: &mut L) -> Result<[u8; PASS_SIZE]> {
    rendezvous_as_receiver(link).await?;
    let mut buf = BytesMut::with_capacity(PASS_SIZE);
    while buf.len() < PASS_SIZE {
        buf.put_u8(link.recv_byte().await?);
    }
    debug!("payload received");
    let mut payload = [0u8; PASS_SIZE];
    payload.copy_from_slice(&buf);
    Ok(payload)
}

/// Transfer a validated passcode (provisioning and re-provisioning).
///
/// # Errors
/// Returns an error if the link fails mid-transfer.
pub async fn send_passcode<L: SerialLink>(link: &mut L, code: &Passcode) -> Result<()> {
    send_payload(link, code.digits()).await
}

/// Receive a provisioning passcode.
///
/// # Errors
/// Returns an error if the link fails or the payload contains a non-digit
/// element: provisioning payloads are panel-validated, so that would be a
/// protocol violation.
pub async fn recv_passcode<L: SerialLink>(link: &mut L) -> Result<Passcode> {
    let payload = recv_payload(link).await?;
    Ok(Passcode::new(payload)?)
}

/// Transfer a verification candidate (possibly the deliberate-mismatch
/// filler for a wrong-length entry).
///
/// # Errors
/// Returns an error if the link fails mid-transfer.
pub async fn send_candidate<L: SerialLink>(link: &mut L, candidate: &Candidate) -> Result<()> {
    send_payload(link, candidate.as_bytes()).await
}

/// Receive a verification candidate. Candidates are not digit-validated.
///
/// # Errors
/// Returns an error if the link fails mid-transfer.
pub async fn recv_candidate<L: SerialLink>(link: &mut L) -> Result<Candidate> {
    Ok(Candidate::from_bytes(recv_payload(link).await?))
}

/// Send the keeper's verdict for one verification round.
///
/// # Errors
/// Returns an error if the link fails.
pub async fn send_verdict<L: SerialLink>(link: &mut L, verdict: Verdict) -> Result<()> {
    debug!(%verdict, "sending verdict");
    Ok(link.send_byte(verdict.to_byte()).await?)
}

/// Receive the keeper's verdict.
///
/// # Errors
/// Returns an error if the link fails or the byte is not a verdict code.
pub async fn recv_verdict<L: SerialLink>(link: &mut L) -> Result<Verdict> {
    let byte = link.recv_byte().await?;
    Ok(Verdict::from_byte(byte)?)
}

/// Send the panel's post-grant action.
///
/// # Errors
/// Returns an error if the link fails.
pub async fn send_action<L: SerialLink>(link: &mut L, action: PanelAction) -> Result<()> {
    debug!(%action, "sending action");
    Ok(link.send_byte(action.to_byte()).await?)
}

/// Receive the panel's post-grant action.
///
/// # Errors
/// Returns an error if the link fails or the byte is not an action code.
pub async fn recv_action<L: SerialLink>(link: &mut L) -> Result<PanelAction> {
    let byte = link.recv_byte().await?;
    Ok(PanelAction::from_byte(byte)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadbolt_hardware::mock::MockSerialLink;
    use std::time::Duration;

    #[tokio::test]
    async fn test_rendezvous_completes_both_roles() {
        let (mut panel, mut keeper) = MockSerialLink::pair();

        let receiver = tokio::spawn(async move {
            rendezvous_as_receiver(&mut keeper).await.unwrap();
            keeper
        });
        rendezvous_as_sender(&mut panel).await.unwrap();
        receiver.await.unwrap();
    }

    #[tokio::test]
    async fn test_payload_arrives_in_order() {
        let (mut panel, mut keeper) = MockSerialLink::pair();
        let code: Passcode = "12345".parse().unwrap();

        let receiver = tokio::spawn(async move { recv_passcode(&mut keeper).await.unwrap() });
        send_passcode(&mut panel, &code).await.unwrap();

        let received = receiver.await.unwrap();
        assert_eq!(received.digits(), &[1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_transfer_is_timing_independent() {
        // A slow sender delivers the same bytes in the same order.
        let (mut panel, mut keeper) = MockSerialLink::pair();

        let receiver = tokio::spawn(async move { recv_candidate(&mut keeper).await.unwrap() });

        rendezvous_as_sender(&mut panel).await.unwrap();
        for &byte in &[9u8, 8, 7, 6, 5] {
            tokio::time::sleep(Duration::from_millis(2)).await;
            panel.send_byte(byte).await.unwrap();
        }

        let received = receiver.await.unwrap();
        assert_eq!(received.as_bytes(), &[9, 8, 7, 6, 5]);
    }

    #[tokio::test]
    async fn test_mismatch_candidate_survives_transfer() {
        let (mut panel, mut keeper) = MockSerialLink::pair();

        let receiver = tokio::spawn(async move { recv_candidate(&mut keeper).await.unwrap() });
        send_candidate(&mut panel, &Candidate::mismatch())
            .await
            .unwrap();

        let received = receiver.await.unwrap();
        assert!(!received.is_well_formed());
    }

    #[tokio::test]
    async fn test_verdict_and_action_round_trip() {
        let (mut panel, mut keeper) = MockSerialLink::pair();

        send_verdict(&mut keeper, Verdict::Match).await.unwrap();
        assert_eq!(recv_verdict(&mut panel).await.unwrap(), Verdict::Match);

        send_action(&mut panel, PanelAction::OpenDoor).await.unwrap();
        assert_eq!(
            recv_action(&mut keeper).await.unwrap(),
            PanelAction::OpenDoor
        );
    }

    #[tokio::test]
    async fn test_unknown_verdict_byte_is_a_violation() {
        let (mut panel, mut keeper) = MockSerialLink::pair();

        keeper.send_byte(0x01).await.unwrap();
        let result = recv_verdict(&mut panel).await;
        assert!(matches!(
            result,
            Err(crate::ProtocolError::Violation(
                deadbolt_core::Error::InvalidVerdict(0x01)
            ))
        ));
    }

    #[tokio::test]
    async fn test_rendezvous_discards_stray_bytes() {
        let (mut panel, mut keeper) = MockSerialLink::pair();

        // Noise queued ahead of the announcement must not derail the
        // receiver.
        panel.send_byte(0x55).await.unwrap();
        panel.send_byte(0x7E).await.unwrap();

        let receiver = tokio::spawn(async move {
            rendezvous_as_receiver(&mut keeper).await.unwrap();
            keeper
        });
        rendezvous_as_sender(&mut panel).await.unwrap();
        receiver.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_peer_fails_transfer() {
        let (mut panel, keeper) = MockSerialLink::pair();
        drop(keeper);

        let result = send_passcode(&mut panel, &"12345".parse().unwrap()).await;
        assert!(matches!(result, Err(crate::ProtocolError::Link(_))));
    }
}
