//! Signed transactions and their wire format.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message                 (see `message`)
//! ```
//!
//! Signature `i` belongs to account key `i` of the message; the first
//! signature doubles as the transaction id.

use base64::Engine as _;
use log::debug;

use crate::compact::{decode_compact_u16, write_compact_len, ByteReader};
use crate::error::SdkError;
use crate::hash::Hash;
use crate::instruction::Instruction;
use crate::keypair::Keypair;
use crate::message::Message;
use crate::pubkey::PublicKey;
use crate::signature::{Signature, SIGNATURE_BYTES};
use crate::signer::{sign_message_bytes, Signer};

/// A message together with one signature slot per required signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// Wrap `message` with zeroed signature slots.
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Sign `message` with every required signer, or fail without producing
    /// any signature.
    pub fn new(message: Message, signers: &[&dyn Signer]) -> Result<Self, SdkError> {
        let message_bytes = message.serialize()?;
        let signatures = sign_message_bytes(&message_bytes, message.signer_keys(), signers)?;
        Ok(Self {
            signatures,
            message,
        })
    }

    /// Compile `instructions` and sign in one step.
    pub fn new_signed_with_payer(
        instructions: &[Instruction],
        fee_payer: &PublicKey,
        signers: &[&dyn Signer],
        recent_blockhash: Hash,
    ) -> Result<Self, SdkError> {
        let message = Message::new(instructions, fee_payer, recent_blockhash)?;
        Self::new(message, signers)
    }

    /// Fill the slots belonging to `signers`, leaving the others untouched.
    ///
    /// Every supplied signer must be one of the required signers.
    pub fn partial_sign(&mut self, signers: &[&dyn Signer]) -> Result<(), SdkError> {
        let signer_keys = self.message.signer_keys();
        let mut slots = Vec::with_capacity(signers.len());
        for signer in signers {
            let key = signer.pubkey();
            let slot = signer_keys
                .iter()
                .position(|k| *k == key)
                .ok_or(SdkError::UnexpectedSigner(key))?;
            slots.push(slot);
        }

        let message_bytes = self.message.serialize()?;
        self.signatures
            .resize(signer_keys.len(), Signature::default());
        for (signer, slot) in signers.iter().zip(slots) {
            self.signatures[slot] = signer.sign_message(&message_bytes);
        }
        Ok(())
    }

    /// Whether every signature slot has been filled.
    pub fn is_signed(&self) -> bool {
        self.signatures.len() == self.message.header.num_required_signatures as usize
            && self.signatures.iter().all(|s| *s != Signature::default())
    }

    /// Verify every signature against its signer key.
    pub fn verify(&self) -> bool {
        let Ok(message_bytes) = self.message.serialize() else {
            return false;
        };
        let signer_keys = self.message.signer_keys();
        self.signatures.len() == signer_keys.len()
            && self
                .signatures
                .iter()
                .zip(signer_keys)
                .all(|(sig, key)| sig.verify(key, &message_bytes))
    }

    /// The transaction id: the fee payer's signature.
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    pub fn message_bytes(&self) -> Result<Vec<u8>, SdkError> {
        self.message.serialize()
    }

    /// Serialize into the wire format accepted by `sendTransaction`.
    pub fn serialize(&self) -> Result<Vec<u8>, SdkError> {
        let message_bytes = self.message.serialize()?;

        let mut wire =
            Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_BYTES + message_bytes.len());
        write_compact_len(&mut wire, self.signatures.len())?;
        for sig in &self.signatures {
            wire.extend_from_slice(sig.as_ref());
        }
        wire.extend_from_slice(&message_bytes);

        Ok(wire)
    }

    /// Base64 of the wire bytes, as RPC transports expect.
    pub fn to_base64(&self) -> Result<String, SdkError> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.serialize()?))
    }

    /// Parse wire bytes, rejecting trailing data.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, SdkError> {
        let mut reader = ByteReader::new(bytes);

        let num_signatures = reader.read_compact_len()?;
        let mut signatures = Vec::with_capacity(num_signatures.min(256));
        for _ in 0..num_signatures {
            signatures.push(Signature::from(
                reader.read_array::<SIGNATURE_BYTES>("signature")?,
            ));
        }

        let message = Message::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(SdkError::MalformedTransaction(format!(
                "{} trailing bytes at offset {}",
                reader.remaining(),
                reader.position()
            )));
        }

        if signatures.len() != message.header.num_required_signatures as usize {
            return Err(SdkError::MalformedTransaction(format!(
                "{} signatures for {} required signers",
                signatures.len(),
                message.header.num_required_signatures
            )));
        }

        Ok(Self {
            signatures,
            message,
        })
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SdkError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| SdkError::InvalidEncoding(format!("base64 decode failed: {e}")))?;
        Self::deserialize(&bytes)
    }
}

/// Everything needed to build one signed transaction.
///
/// Key material is always supplied by the caller.
pub struct TransactionParams<'a> {
    pub fee_payer: PublicKey,
    pub recent_blockhash: Hash,
    pub instructions: &'a [Instruction],
    pub signers: &'a [&'a dyn Signer],
}

/// Compile, sign and serialize in one call.
///
/// Either every required signature is produced or the call fails before
/// any bytes are emitted.
pub fn create_raw_transaction(params: &TransactionParams<'_>) -> Result<Vec<u8>, SdkError> {
    let tx = Transaction::new_signed_with_payer(
        params.instructions,
        &params.fee_payer,
        params.signers,
        params.recent_blockhash,
    )?;
    let wire = tx.serialize()?;
    debug!(
        "built transaction {} ({} bytes)",
        tx.signature().map(ToString::to_string).unwrap_or_default(),
        wire.len()
    );
    Ok(wire)
}

/// Sign a pre-built wire transaction with `keypair`.
///
/// Locates the key-pair's slot among the required signers, signs the message
/// bytes exactly as they appear in `raw_tx`, and returns a copy with that
/// slot overwritten. Other slots are left as they were.
pub fn sign_raw_transaction(keypair: &Keypair, raw_tx: &[u8]) -> Result<Vec<u8>, SdkError> {
    let our_pubkey = keypair.pubkey();

    // Layout: compact-u16(num_signatures) | 64-byte signatures * N | message
    let (num_sigs, compact_len) = decode_compact_u16(raw_tx)?;
    if num_sigs == 0 {
        return Err(SdkError::MalformedTransaction(
            "transaction has zero signatures".into(),
        ));
    }

    let sigs_start = compact_len;
    let sigs_end = sigs_start + (num_sigs as usize) * SIGNATURE_BYTES;
    if sigs_end > raw_tx.len() {
        return Err(SdkError::MalformedTransaction(
            "signature slots exceed transaction length".into(),
        ));
    }

    // The message starts right after the signature slots.
    let message_bytes = &raw_tx[sigs_end..];
    let message = Message::deserialize(message_bytes)?;

    let signer_keys = message.signer_keys();
    if signer_keys.len() != num_sigs as usize {
        return Err(SdkError::MalformedTransaction(format!(
            "{num_sigs} signature slots for {} required signers",
            signer_keys.len()
        )));
    }

    let signer_idx = signer_keys
        .iter()
        .position(|k| *k == our_pubkey)
        .ok_or(SdkError::MissingSigner(our_pubkey))?;

    let signature = keypair.sign_message(message_bytes);

    let mut signed_tx = raw_tx.to_vec();
    let sig_offset = sigs_start + signer_idx * SIGNATURE_BYTES;
    signed_tx[sig_offset..sig_offset + SIGNATURE_BYTES].copy_from_slice(signature.as_ref());

    debug!("signed slot {signer_idx} of {num_sigs} for {our_pubkey}");
    Ok(signed_tx)
}
