use ibc_proto::google::protobuf::Any;
use prost::Message;

/// A message that can be submitted to a ledger inside a transaction.
///
/// Every message has a raw protobuf representation and a unique type URL,
/// which together produce the [`Any`] that ends up in the transaction body.
pub trait Msg: Clone {
    type Raw: From<Self> + Message;

    /// Unique type identifier for this message, to support encoding to/from `prost_types::Any`.
    fn type_url(&self) -> String;

    #[allow(clippy::wrong_self_convention)]
    fn to_any(self) -> Any {
        Any {
            type_url: self.type_url(),
            value: self.get_sign_bytes(),
        }
    }

    fn get_sign_bytes(self) -> Vec<u8> {
        let raw_msg: Self::Raw = self.into();
        raw_msg.encode_to_vec()
    }
}

/// Size in bytes that a message occupies in an encoded transaction body.
pub fn encoded_message_size(message: &Any) -> usize {
    message.encoded_len()
}
