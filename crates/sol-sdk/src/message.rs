//! Transaction message: the exact bytes every signer signs.
//!
//! ```text
//! Message:
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          compact-u16
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      compact-u16
//!   instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index      u8
//!   num_accounts          compact-u16
//!   account_indices       u8 * num_accounts
//!   data_len              compact-u16
//!   data                  u8 * data_len
//! ```

use log::debug;

use crate::account_table::{AccountTable, TableCounts};
use crate::compact::{write_compact_len, ByteReader};
use crate::error::SdkError;
use crate::hash::{Hash, HASH_BYTES};
use crate::instruction::{CompiledInstruction, Instruction};
use crate::pubkey::{PublicKey, PUBKEY_BYTES};

/// The three header counts that describe the account table's layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed_accounts: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    /// Narrow table counts to header bytes.
    ///
    /// Every count must fit a `u8`, and so must every account index.
    fn from_counts(counts: TableCounts) -> Result<Self, SdkError> {
        fn narrow(class: &'static str, count: usize) -> Result<u8, SdkError> {
            u8::try_from(count).map_err(|_| SdkError::TableTooLarge { class, count })
        }

        if counts.total > u8::MAX as usize + 1 {
            return Err(SdkError::TableTooLarge {
                class: "account keys",
                count: counts.total,
            });
        }

        Ok(Self {
            num_required_signatures: narrow("required signatures", counts.signers)?,
            num_readonly_signed_accounts: narrow(
                "readonly signed accounts",
                counts.readonly_signed,
            )?,
            num_readonly_unsigned_accounts: narrow(
                "readonly unsigned accounts",
                counts.readonly_unsigned,
            )?,
        })
    }
}

/// A compiled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    /// All account keys referenced by this message, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile `instructions` with `fee_payer` at index 0.
    ///
    /// Fails with [`SdkError::TableTooLarge`] when a header count or an
    /// account index would not fit in one byte.
    pub fn new(
        instructions: &[Instruction],
        fee_payer: &PublicKey,
        recent_blockhash: Hash,
    ) -> Result<Self, SdkError> {
        let table = AccountTable::compile(fee_payer, instructions);
        let header = MessageHeader::from_counts(table.counts())?;

        let compiled = instructions
            .iter()
            .map(|ix| table.compile_instruction(ix))
            .collect();

        Ok(Self {
            header,
            account_keys: table.into_keys(),
            recent_blockhash,
            instructions: compiled,
        })
    }

    pub fn fee_payer(&self) -> Option<&PublicKey> {
        self.account_keys.first()
    }

    /// The signer prefix of the account table.
    pub fn signer_keys(&self) -> &[PublicKey] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_required_signatures as usize
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let num_signers = self.header.num_required_signatures as usize;
        let num_keys = self.account_keys.len();
        if index >= num_keys {
            return false;
        }
        if index < num_signers {
            index < num_signers.saturating_sub(self.header.num_readonly_signed_accounts as usize)
        } else {
            index < num_keys.saturating_sub(self.header.num_readonly_unsigned_accounts as usize)
        }
    }

    /// Serialize into the exact byte layout that gets signed.
    pub fn serialize(&self) -> Result<Vec<u8>, SdkError> {
        let mut buf = Vec::with_capacity(256);

        // Header: 3 bytes.
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed_accounts);
        buf.push(self.header.num_readonly_unsigned_accounts);

        // Account keys.
        write_compact_len(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }

        // Recent blockhash.
        buf.extend_from_slice(self.recent_blockhash.as_ref());

        // Instructions.
        write_compact_len(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            write_compact_len(&mut buf, ix.accounts.len())?;
            buf.extend_from_slice(&ix.accounts);

            write_compact_len(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }

        debug!(
            "serialized message: {} keys, {} instruction(s), {} bytes",
            self.account_keys.len(),
            self.instructions.len(),
            buf.len()
        );
        Ok(buf)
    }

    /// Parse message bytes, rejecting trailing data.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, SdkError> {
        let mut reader = ByteReader::new(bytes);
        let message = Self::read_from(&mut reader)?;

        if reader.remaining() != 0 {
            return Err(SdkError::MalformedTransaction(format!(
                "{} trailing bytes at offset {}",
                reader.remaining(),
                reader.position()
            )));
        }
        Ok(message)
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, SdkError> {
        let header = MessageHeader {
            num_required_signatures: reader.read_u8("header")?,
            num_readonly_signed_accounts: reader.read_u8("header")?,
            num_readonly_unsigned_accounts: reader.read_u8("header")?,
        };

        let num_keys = reader.read_compact_len()?;
        let mut account_keys = Vec::with_capacity(num_keys.min(256));
        for _ in 0..num_keys {
            account_keys.push(PublicKey::from(
                reader.read_array::<PUBKEY_BYTES>("account key")?,
            ));
        }

        let recent_blockhash = Hash::from(reader.read_array::<HASH_BYTES>("recent blockhash")?);

        let num_instructions = reader.read_compact_len()?;
        let mut instructions = Vec::with_capacity(num_instructions.min(64));
        for _ in 0..num_instructions {
            let program_id_index = reader.read_u8("program id index")?;
            let num_accounts = reader.read_compact_len()?;
            let accounts = reader.read_bytes(num_accounts, "account indices")?.to_vec();
            let data_len = reader.read_compact_len()?;
            let data = reader.read_bytes(data_len, "instruction data")?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        };
        message.sanitize()?;
        Ok(message)
    }

    /// Check the header against the table and every index against its bounds.
    fn sanitize(&self) -> Result<(), SdkError> {
        let num_keys = self.account_keys.len();
        let num_signers = self.header.num_required_signatures as usize;

        if num_signers == 0 {
            return Err(SdkError::MalformedTransaction(
                "message has no fee payer".into(),
            ));
        }
        if num_signers > num_keys {
            return Err(SdkError::MalformedTransaction(format!(
                "{num_signers} required signatures but only {num_keys} account keys"
            )));
        }
        if self.header.num_readonly_signed_accounts as usize >= num_signers {
            return Err(SdkError::MalformedTransaction(
                "fee payer must be a writable signer".into(),
            ));
        }
        if self.header.num_readonly_unsigned_accounts as usize > num_keys - num_signers {
            return Err(SdkError::MalformedTransaction(
                "readonly unsigned count exceeds non-signer accounts".into(),
            ));
        }

        for (i, ix) in self.instructions.iter().enumerate() {
            let out_of_range = std::iter::once(&ix.program_id_index)
                .chain(ix.accounts.iter())
                .find(|&&idx| idx as usize >= num_keys);
            if let Some(idx) = out_of_range {
                return Err(SdkError::MalformedTransaction(format!(
                    "instruction {i} references account {idx} of {num_keys}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::encode_compact_u16;
    use crate::instruction::AccountMeta;

    fn key(byte: u8) -> PublicKey {
        PublicKey::from([byte; 32])
    }

    fn transfer_like(from: PublicKey, to: PublicKey, program: PublicKey) -> Instruction {
        Instruction::new(
            program,
            vec![AccountMeta::new(from, true), AccountMeta::new(to, false)],
            vec![2, 0, 0, 0, 0xe8, 0x03, 0, 0, 0, 0, 0, 0],
        )
    }

    #[test]
    fn end_to_end_layout() {
        let (f, x, p) = (key(0x0F), key(0x0A), key(0x0B));
        let ix = Instruction::new(
            p,
            vec![AccountMeta::new(f, true), AccountMeta::new_readonly(x, false)],
            vec![1, 2, 3],
        );

        let message = Message::new(&[ix], &f, Hash::default()).unwrap();
        assert_eq!(message.fee_payer(), Some(&f));
        assert_eq!(message.account_keys, vec![f, x, p]);
        assert_eq!(
            message.instructions,
            vec![CompiledInstruction {
                program_id_index: 2,
                accounts: vec![0, 1],
                data: vec![1, 2, 3],
            }]
        );

        // X and P are both read-only non-signers.
        let mut expected = vec![1, 0, 2, 3];
        expected.extend_from_slice(f.as_ref());
        expected.extend_from_slice(x.as_ref());
        expected.extend_from_slice(p.as_ref());
        expected.extend_from_slice(&[0u8; 32]);
        expected.extend_from_slice(&[1, 2, 2, 0, 1, 3, 1, 2, 3]);
        assert_eq!(message.serialize().unwrap(), expected);
    }

    #[test]
    fn header_counts() {
        let (from, to) = (key(1), key(2));
        let message = Message::new(
            &[transfer_like(from, to, PublicKey::default())],
            &from,
            Hash::default(),
        )
        .unwrap();

        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            }
        );
    }

    #[test]
    fn empty_message_is_valid() {
        let payer = key(3);
        let message = Message::new(&[], &payer, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![payer]);
        assert!(message.instructions.is_empty());

        let bytes = message.serialize().unwrap();
        assert_eq!(bytes.len(), 3 + 1 + 32 + 32 + 1);
        assert_eq!(Message::deserialize(&bytes).unwrap(), message);
    }

    #[test]
    fn self_transfer_deduplicates_accounts() {
        let k = key(0xAA);
        let message =
            Message::new(&[transfer_like(k, k, PublicKey::default())], &k, Hash::default())
                .unwrap();
        assert_eq!(message.account_keys.len(), 2);
        assert_eq!(message.header.num_required_signatures, 1);
        assert_eq!(message.instructions[0].accounts, vec![0, 0]);
    }

    #[test]
    fn serialize_contains_blockhash_at_offset() {
        let blockhash = Hash::from([0xCC; 32]);
        let (from, to) = (key(1), key(2));
        let message =
            Message::new(&[transfer_like(from, to, PublicKey::default())], &from, blockhash)
                .unwrap();
        let bytes = message.serialize().unwrap();

        let n = message.account_keys.len();
        let offset = 3 + encode_compact_u16(n as u16).len() + 32 * n;
        assert_eq!(&bytes[offset..offset + 32], blockhash.as_ref());
    }

    #[test]
    fn too_many_signers_is_rejected() {
        let payer = key(0);
        let signers: Vec<AccountMeta> = (1..=300u16)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[..2].copy_from_slice(&i.to_le_bytes());
                AccountMeta::new(PublicKey::from(bytes), true)
            })
            .collect();
        let ix = Instruction::new(key(0xFF), signers, vec![]);

        let err = Message::new(&[ix], &payer, Hash::default()).unwrap_err();
        assert!(matches!(err, SdkError::TableTooLarge { .. }));
    }

    /// Payer, one program and `readonly` distinct read-only accounts.
    fn readonly_fanout(readonly: u16) -> (PublicKey, Instruction) {
        let accounts = (1..=readonly)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[..2].copy_from_slice(&i.to_le_bytes());
                AccountMeta::new_readonly(PublicKey::from(bytes), false)
            })
            .collect();
        (key(0), Instruction::new(key(0xFF), accounts, vec![]))
    }

    #[test]
    fn table_of_exactly_256_keys_is_accepted() {
        let (payer, ix) = readonly_fanout(254);
        let message = Message::new(&[ix], &payer, Hash::default()).unwrap();

        assert_eq!(message.account_keys.len(), 256);
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 255,
            }
        );
        assert_eq!(message.instructions[0].program_id_index, 255);
    }

    #[test]
    fn table_of_257_keys_is_rejected() {
        let (payer, ix) = readonly_fanout(255);
        assert_eq!(
            Message::new(&[ix], &payer, Hash::default()).unwrap_err(),
            SdkError::TableTooLarge {
                class: "account keys",
                count: 257
            }
        );
    }

    #[test]
    fn index_beyond_u8_is_rejected() {
        let payer = key(0);
        let accounts: Vec<AccountMeta> = (1..=200u16)
            .flat_map(|i| {
                let mut w = [0u8; 32];
                w[..2].copy_from_slice(&i.to_le_bytes());
                let mut r = w;
                r[2] = 1;
                [
                    AccountMeta::new(PublicKey::from(w), false),
                    AccountMeta::new_readonly(PublicKey::from(r), false),
                ]
            })
            .collect();
        let ix = Instruction::new(key(0xFF), accounts, vec![]);

        assert_eq!(
            Message::new(&[ix], &payer, Hash::default()).unwrap_err(),
            SdkError::TableTooLarge {
                class: "account keys",
                count: 402
            }
        );
    }

    #[test]
    fn writability_by_index() {
        let (payer, ro_signer, w, program) = (key(1), key(2), key(3), key(4));
        let ix = Instruction::new(
            program,
            vec![
                AccountMeta::new_readonly(ro_signer, true),
                AccountMeta::new(w, false),
            ],
            vec![],
        );
        let message = Message::new(&[ix], &payer, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![payer, ro_signer, w, program]);

        assert!(message.is_writable(0) && message.is_signer(0));
        assert!(!message.is_writable(1) && message.is_signer(1));
        assert!(message.is_writable(2) && !message.is_signer(2));
        assert!(!message.is_writable(3));
        assert!(!message.is_writable(4));
        assert_eq!(message.signer_keys(), &[payer, ro_signer]);
    }

    // -- deserialize --------------------------------------------------------

    #[test]
    fn deserialize_inverts_serialize() {
        let (from, to) = (key(1), key(2));
        let message = Message::new(
            &[transfer_like(from, to, PublicKey::default())],
            &from,
            Hash::from([7u8; 32]),
        )
        .unwrap();
        let bytes = message.serialize().unwrap();
        assert_eq!(Message::deserialize(&bytes).unwrap(), message);
    }

    #[test]
    fn deserialize_rejects_trailing_bytes() {
        let message = Message::new(&[], &key(1), Hash::default()).unwrap();
        let mut bytes = message.serialize().unwrap();
        bytes.push(0);
        assert!(matches!(
            Message::deserialize(&bytes),
            Err(SdkError::MalformedTransaction(_))
        ));
    }

    #[test]
    fn deserialize_rejects_truncation() {
        let message = Message::new(&[], &key(1), Hash::default()).unwrap();
        let bytes = message.serialize().unwrap();
        assert!(Message::deserialize(&bytes[..bytes.len() - 5]).is_err());
        assert!(Message::deserialize(&[]).is_err());
    }

    #[test]
    fn deserialize_rejects_out_of_range_index() {
        let (from, to) = (key(1), key(2));
        let mut message = Message::new(
            &[transfer_like(from, to, PublicKey::default())],
            &from,
            Hash::default(),
        )
        .unwrap();
        message.instructions[0].program_id_index = 9;
        let bytes = message.serialize().unwrap();

        let err = Message::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("references account 9"));
    }

    #[test]
    fn deserialize_rejects_inconsistent_header() {
        let mut message = Message::new(&[], &key(1), Hash::default()).unwrap();
        message.header.num_required_signatures = 2;
        let bytes = message.serialize().unwrap();
        assert!(matches!(
            Message::deserialize(&bytes),
            Err(SdkError::MalformedTransaction(_))
        ));
    }
}
