//! Call-end reason taxonomy.
//!
//! The engine reports why a call ended as a small integer in the cleared
//! parameter block. This module carries the closed enumeration for those
//! codes and the exhaustive wire mapping; values outside the taxonomy decode
//! to an error, never to a default.

use crate::errors::{CallClearedError, CallClearedResult};

/// Why a call ended, as reported in the call-cleared parameter block.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallEndReason {
    /// Local endpoint application cleared the call.
    LocalUser = 0,
    /// Local endpoint did not accept the call before it timed out.
    NoAccept = 1,
    /// Local endpoint declined to answer the call.
    AnswerDenied = 2,
    /// Remote endpoint application cleared the call.
    RemoteUser = 3,
    /// Remote endpoint refused the call.
    Refusal = 4,
    /// Remote endpoint did not answer before the call timed out.
    NoAnswer = 5,
    /// Remote caller abandoned the call while it was ringing.
    CallerAbort = 6,
    /// The transport to the remote failed.
    TransportFail = 7,
    /// The transport connection could not be established.
    ConnectFail = 8,
    /// The gatekeeper cleared the call.
    Gatekeeper = 9,
    /// Called party was not registered with the gatekeeper.
    NoUser = 10,
    /// Insufficient bandwidth for the call.
    NoBandwidth = 11,
    /// No common media capabilities could be negotiated.
    CapabilityExchange = 12,
    /// The call was forwarded elsewhere.
    CallForwarded = 13,
    /// The call failed a security check.
    SecurityDenial = 14,
    /// Local endpoint was busy.
    LocalBusy = 15,
    /// Local endpoint was congested.
    LocalCongestion = 16,
    /// Remote endpoint was busy.
    RemoteBusy = 17,
    /// Remote endpoint was congested.
    RemoteCongestion = 18,
    /// The remote address could not be reached.
    Unreachable = 19,
    /// The remote host had no endpoint listening.
    NoEndPoint = 20,
    /// The remote host was offline.
    HostOffline = 21,
    /// A transient failure cleared the call; a retry may succeed.
    TemporaryFailure = 22,
    /// Cleared with a specific Q.931 cause from the signalling layer.
    Q931Cause = 23,
    /// The configured maximum call duration elapsed.
    DurationLimit = 24,
    /// The conference identifier was not valid.
    InvalidConferenceId = 25,
    /// No dial tone was detected on the line.
    NoDialTone = 26,
    /// No ring back tone was detected on the line.
    NoRingBackTone = 27,
    /// The line was out of service.
    OutOfService = 28,
    /// An address completion message denied the call.
    AcmDenied = 29,
    /// Media transport failed or was lost.
    MediaFailed = 30,
    /// The call ended before any media was established.
    CallCompletedTooSoon = 31,
    /// A certificate authority check rejected the call.
    CertificateAuthority = 32,
    /// The destination address was malformed.
    IllegalAddress = 33,
}

impl CallEndReason {
    /// Every member of the taxonomy, in wire-code order.
    pub const ALL: [Self; 34] = [
        Self::LocalUser,
        Self::NoAccept,
        Self::AnswerDenied,
        Self::RemoteUser,
        Self::Refusal,
        Self::NoAnswer,
        Self::CallerAbort,
        Self::TransportFail,
        Self::ConnectFail,
        Self::Gatekeeper,
        Self::NoUser,
        Self::NoBandwidth,
        Self::CapabilityExchange,
        Self::CallForwarded,
        Self::SecurityDenial,
        Self::LocalBusy,
        Self::LocalCongestion,
        Self::RemoteBusy,
        Self::RemoteCongestion,
        Self::Unreachable,
        Self::NoEndPoint,
        Self::HostOffline,
        Self::TemporaryFailure,
        Self::Q931Cause,
        Self::DurationLimit,
        Self::InvalidConferenceId,
        Self::NoDialTone,
        Self::NoRingBackTone,
        Self::OutOfService,
        Self::AcmDenied,
        Self::MediaFailed,
        Self::CallCompletedTooSoon,
        Self::CertificateAuthority,
        Self::IllegalAddress,
    ];

    /// Decodes a wire code into a taxonomy member.
    ///
    /// # Errors
    /// Returns [`CallClearedError::UnknownReasonCode`] for integers the
    /// taxonomy does not define.
    pub fn from_code(code: i32) -> CallClearedResult<Self> {
        let reason = match code {
            0 => Self::LocalUser,
            1 => Self::NoAccept,
            2 => Self::AnswerDenied,
            3 => Self::RemoteUser,
            4 => Self::Refusal,
            5 => Self::NoAnswer,
            6 => Self::CallerAbort,
            7 => Self::TransportFail,
            8 => Self::ConnectFail,
            9 => Self::Gatekeeper,
            10 => Self::NoUser,
            11 => Self::NoBandwidth,
            12 => Self::CapabilityExchange,
            13 => Self::CallForwarded,
            14 => Self::SecurityDenial,
            15 => Self::LocalBusy,
            16 => Self::LocalCongestion,
            17 => Self::RemoteBusy,
            18 => Self::RemoteCongestion,
            19 => Self::Unreachable,
            20 => Self::NoEndPoint,
            21 => Self::HostOffline,
            22 => Self::TemporaryFailure,
            23 => Self::Q931Cause,
            24 => Self::DurationLimit,
            25 => Self::InvalidConferenceId,
            26 => Self::NoDialTone,
            27 => Self::NoRingBackTone,
            28 => Self::OutOfService,
            29 => Self::AcmDenied,
            30 => Self::MediaFailed,
            31 => Self::CallCompletedTooSoon,
            32 => Self::CertificateAuthority,
            33 => Self::IllegalAddress,
            other => return Err(CallClearedError::UnknownReasonCode(other)),
        };
        Ok(reason)
    }

    /// The wire encoding of this member.
    #[inline(always)]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Human-readable text for this reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalUser => "local party cleared the call",
            Self::NoAccept => "local party did not accept the call",
            Self::AnswerDenied => "local party declined to answer",
            Self::RemoteUser => "remote party cleared the call",
            Self::Refusal => "remote party refused the call",
            Self::NoAnswer => "remote party did not answer",
            Self::CallerAbort => "caller abandoned the call while ringing",
            Self::TransportFail => "call transport failed",
            Self::ConnectFail => "transport connection could not be established",
            Self::Gatekeeper => "gatekeeper cleared the call",
            Self::NoUser => "called party is not registered",
            Self::NoBandwidth => "insufficient bandwidth",
            Self::CapabilityExchange => "no common media capabilities",
            Self::CallForwarded => "call was forwarded",
            Self::SecurityDenial => "call failed a security check",
            Self::LocalBusy => "local party is busy",
            Self::LocalCongestion => "local party is congested",
            Self::RemoteBusy => "remote party is busy",
            Self::RemoteCongestion => "remote party is congested",
            Self::Unreachable => "remote address is unreachable",
            Self::NoEndPoint => "no endpoint listening on the remote host",
            Self::HostOffline => "remote host is offline",
            Self::TemporaryFailure => "temporary failure",
            Self::Q931Cause => "cleared with a Q.931 cause",
            Self::DurationLimit => "maximum call duration reached",
            Self::InvalidConferenceId => "invalid conference identifier",
            Self::NoDialTone => "no dial tone",
            Self::NoRingBackTone => "no ring back tone",
            Self::OutOfService => "line is out of service",
            Self::AcmDenied => "address completion message denied the call",
            Self::MediaFailed => "media transport failed",
            Self::CallCompletedTooSoon => "call ended before media was established",
            Self::CertificateAuthority => "certificate authority rejected the call",
            Self::IllegalAddress => "destination address is malformed",
        }
    }

    /// Whether this reason is a normal hangup rather than a failure.
    ///
    /// A call cleared by either party is the expected end of its life; every
    /// other reason describes something going wrong.
    #[inline(always)]
    pub fn is_normal(self) -> bool {
        matches!(self, Self::LocalUser | Self::RemoteUser)
    }
}

impl TryFrom<i32> for CallEndReason {
    type Error = CallClearedError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl std::fmt::Display for CallEndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_member_round_trips_through_its_code() {
        for reason in CallEndReason::ALL {
            assert_eq!(CallEndReason::from_code(reason.code()).unwrap(), reason);
        }
    }

    #[test]
    fn wire_codes_are_dense_and_start_at_zero() {
        for (index, reason) in CallEndReason::ALL.iter().enumerate() {
            assert_eq!(reason.code(), i32::try_from(index).unwrap());
        }
    }

    #[test]
    fn unmapped_codes_decode_to_an_error() {
        for code in [-1, 34, 255, i32::MAX] {
            match CallEndReason::from_code(code) {
                Err(CallClearedError::UnknownReasonCode(c)) => assert_eq!(c, code),
                other => panic!("expected UnknownReasonCode, got {other:?}"),
            }
        }
    }

    #[test]
    fn only_party_hangups_are_normal() {
        assert!(CallEndReason::LocalUser.is_normal());
        assert!(CallEndReason::RemoteUser.is_normal());
        let failures = CallEndReason::ALL.iter().filter(|r| !r.is_normal()).count();
        assert_eq!(failures, CallEndReason::ALL.len() - 2);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            CallEndReason::RemoteBusy.to_string(),
            CallEndReason::RemoteBusy.as_str()
        );
    }
}
