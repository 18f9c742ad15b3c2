/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX 4.2 dictionary for the quote workflow.
//!
//! Covers the standard header and trailer, the session messages and the
//! four quote-workflow messages of this crate.

use crate::tag;
use rfqfix_dictionary::{
    Dictionary, FieldDef, FieldType, GroupDef, MessageCategory, MessageDef, Version,
};

const FIELDS: &[(u32, &str, FieldType)] = &[
    (7, "BeginSeqNo", FieldType::SeqNum),
    (tag::BEGIN_STRING, "BeginString", FieldType::String),
    (tag::BODY_LENGTH, "BodyLength", FieldType::Length),
    (tag::CHECK_SUM, "CheckSum", FieldType::String),
    (16, "EndSeqNo", FieldType::SeqNum),
    (tag::MSG_SEQ_NUM, "MsgSeqNum", FieldType::SeqNum),
    (tag::MSG_TYPE, "MsgType", FieldType::String),
    (36, "NewSeqNo", FieldType::SeqNum),
    (tag::ORDER_QTY, "OrderQty", FieldType::Qty),
    (tag::POSS_DUP_FLAG, "PossDupFlag", FieldType::Boolean),
    (tag::PRICE, "Price", FieldType::Price),
    (45, "RefSeqNum", FieldType::SeqNum),
    (tag::SENDER_COMP_ID, "SenderCompID", FieldType::String),
    (tag::SENDER_SUB_ID, "SenderSubID", FieldType::String),
    (tag::SENDING_TIME, "SendingTime", FieldType::UtcTimestamp),
    (tag::SIDE, "Side", FieldType::Char),
    (tag::SYMBOL, "Symbol", FieldType::String),
    (tag::TARGET_COMP_ID, "TargetCompID", FieldType::String),
    (tag::TARGET_SUB_ID, "TargetSubID", FieldType::String),
    (tag::TEXT, "Text", FieldType::String),
    (tag::VALID_UNTIL_TIME, "ValidUntilTime", FieldType::UtcTimestamp),
    (tag::SIGNATURE, "Signature", FieldType::Data),
    (tag::SECURE_DATA_LEN, "SecureDataLen", FieldType::Length),
    (tag::SECURE_DATA, "SecureData", FieldType::Data),
    (tag::SIGNATURE_LENGTH, "SignatureLength", FieldType::Length),
    (tag::POSS_RESEND, "PossResend", FieldType::Boolean),
    (98, "EncryptMethod", FieldType::Int),
    (108, "HeartBtInt", FieldType::Int),
    (112, "TestReqID", FieldType::String),
    (tag::ON_BEHALF_OF_COMP_ID, "OnBehalfOfCompID", FieldType::String),
    (tag::ON_BEHALF_OF_SUB_ID, "OnBehalfOfSubID", FieldType::String),
    (tag::QUOTE_ID, "QuoteID", FieldType::String),
    (tag::ORIG_SENDING_TIME, "OrigSendingTime", FieldType::UtcTimestamp),
    (123, "GapFillFlag", FieldType::Boolean),
    (tag::EXPIRE_TIME, "ExpireTime", FieldType::UtcTimestamp),
    (tag::DELIVER_TO_COMP_ID, "DeliverToCompID", FieldType::String),
    (tag::DELIVER_TO_SUB_ID, "DeliverToSubID", FieldType::String),
    (tag::QUOTE_REQ_ID, "QuoteReqID", FieldType::String),
    (tag::BID_PX, "BidPx", FieldType::Price),
    (tag::OFFER_PX, "OfferPx", FieldType::Price),
    (141, "ResetSeqNumFlag", FieldType::Boolean),
    (tag::SENDER_LOCATION_ID, "SenderLocationID", FieldType::String),
    (tag::TARGET_LOCATION_ID, "TargetLocationID", FieldType::String),
    (tag::ON_BEHALF_OF_LOCATION_ID, "OnBehalfOfLocationID", FieldType::String),
    (tag::DELIVER_TO_LOCATION_ID, "DeliverToLocationID", FieldType::String),
    (tag::NO_RELATED_SYM, "NoRelatedSym", FieldType::NumInGroup),
    (tag::XML_DATA_LEN, "XmlDataLen", FieldType::Length),
    (tag::XML_DATA, "XmlData", FieldType::Data),
    (tag::QUOTE_STATUS, "QuoteStatus", FieldType::Int),
    (tag::QUOTE_REJECT_REASON, "QuoteRejectReason", FieldType::Int),
    (tag::MESSAGE_ENCODING, "MessageEncoding", FieldType::String),
    (tag::LAST_MSG_SEQ_NUM_PROCESSED, "LastMsgSeqNumProcessed", FieldType::SeqNum),
    (tag::ON_BEHALF_OF_SENDING_TIME, "OnBehalfOfSendingTime", FieldType::UtcTimestamp),
    (371, "RefTagID", FieldType::Int),
    (372, "RefMsgType", FieldType::String),
    (373, "SessionRejectReason", FieldType::Int),
    (380, "BusinessRejectReason", FieldType::Int),
    (tag::RFQ_REQ_ID, "RFQReqID", FieldType::String),
    (tag::QUOTE_REQUEST_REJECT_REASON, "QuoteRequestRejectReason", FieldType::Int),
    (tag::QUOTE_RESP_ID, "QuoteRespID", FieldType::String),
    (tag::QUOTE_RESP_TYPE, "QuoteRespType", FieldType::Int),
];

/// Header tags in standard order, with their required flag.
const HEADER: &[(u32, bool)] = &[
    (tag::BEGIN_STRING, true),
    (tag::BODY_LENGTH, true),
    (tag::MSG_TYPE, true),
    (tag::SENDER_COMP_ID, true),
    (tag::TARGET_COMP_ID, true),
    (tag::ON_BEHALF_OF_COMP_ID, false),
    (tag::DELIVER_TO_COMP_ID, false),
    (tag::SECURE_DATA_LEN, false),
    (tag::SECURE_DATA, false),
    (tag::MSG_SEQ_NUM, true),
    (tag::SENDER_SUB_ID, false),
    (tag::SENDER_LOCATION_ID, false),
    (tag::TARGET_SUB_ID, false),
    (tag::TARGET_LOCATION_ID, false),
    (tag::ON_BEHALF_OF_SUB_ID, false),
    (tag::ON_BEHALF_OF_LOCATION_ID, false),
    (tag::DELIVER_TO_SUB_ID, false),
    (tag::DELIVER_TO_LOCATION_ID, false),
    (tag::POSS_DUP_FLAG, false),
    (tag::POSS_RESEND, false),
    (tag::SENDING_TIME, true),
    (tag::ORIG_SENDING_TIME, false),
    (tag::XML_DATA_LEN, false),
    (tag::XML_DATA, false),
    (tag::MESSAGE_ENCODING, false),
    (tag::LAST_MSG_SEQ_NUM_PROCESSED, false),
    (tag::ON_BEHALF_OF_SENDING_TIME, false),
];

const TRAILER: &[(u32, bool)] = &[
    (tag::SIGNATURE_LENGTH, false),
    (tag::SIGNATURE, false),
    (tag::CHECK_SUM, true),
];

/// Builds the FIX 4.2 quote-workflow dictionary.
#[must_use]
pub fn dictionary() -> Dictionary {
    let mut dict = Dictionary::new(Version::Fix42);

    for &(tag, name, field_type) in FIELDS {
        dict.add_field(field_def(tag, name, field_type));
    }
    for &(tag, required) in HEADER {
        dict.add_header_field(tag, required);
    }
    for &(tag, required) in TRAILER {
        dict.add_trailer_field(tag, required);
    }

    for message in session_messages() {
        dict.add_message(message);
    }
    for message in quote_messages() {
        dict.add_message(message);
    }
    dict
}

fn field_def(tag: u32, name: &str, field_type: FieldType) -> FieldDef {
    let def = FieldDef::new(tag, name, field_type);
    let yes_no = [("Y", "YES"), ("N", "NO")];
    match tag {
        tag::POSS_DUP_FLAG | tag::POSS_RESEND | 123 | 141 => def.with_values(yes_no),
        98 => def.with_values([
            ("0", "NONE_OTHER"),
            ("1", "PKCS"),
            ("2", "DES"),
            ("3", "PKCS_DES"),
            ("4", "PGP_DES"),
            ("5", "PGP_DES_MD5"),
            ("6", "PEM_DES_MD5"),
        ]),
        tag::SIDE => def.with_values([
            ("1", "BUY"),
            ("2", "SELL"),
            ("3", "BUY_MINUS"),
            ("4", "SELL_PLUS"),
            ("5", "SELL_SHORT"),
            ("6", "SELL_SHORT_EXEMPT"),
            ("7", "UNDISCLOSED"),
            ("8", "CROSS"),
            ("9", "CROSS_SHORT"),
        ]),
        tag::QUOTE_REQUEST_REJECT_REASON => def.with_values([
            ("1", "UNKNOWN_SYMBOL"),
            ("2", "EXCHANGE_CLOSED"),
            ("3", "QUOTE_REQUEST_EXCEEDS_LIMIT"),
            ("4", "TOO_LATE_TO_ENTER"),
            ("5", "INVALID_PRICE"),
            ("6", "NOT_AUTHORIZED_TO_REQUEST_QUOTE"),
            ("7", "NO_MATCH_FOR_INQUIRY"),
            ("8", "NO_MARKET_FOR_INSTRUMENT"),
            ("9", "NO_INVENTORY"),
            ("10", "PASS"),
            ("99", "OTHER"),
        ]),
        tag::QUOTE_RESP_TYPE => def.with_values([
            ("1", "HIT_LIFT"),
            ("2", "COUNTER"),
            ("3", "EXPIRED"),
            ("4", "COVER"),
            ("5", "DONE_AWAY"),
            ("6", "PASS"),
            ("7", "END_TRADE"),
            ("8", "TIMED_OUT"),
        ]),
        tag::QUOTE_STATUS => def.with_values([
            ("0", "ACCEPTED"),
            ("1", "CANCELED_FOR_SYMBOL"),
            ("2", "CANCELED_FOR_SECURITY_TYPE"),
            ("3", "CANCELED_FOR_UNDERLYING"),
            ("4", "CANCELED_ALL"),
            ("5", "REJECTED"),
            ("6", "REMOVED_FROM_MARKET"),
            ("7", "EXPIRED"),
            ("8", "QUERY"),
            ("9", "QUOTE_NOT_FOUND"),
            ("10", "PENDING"),
            ("11", "PASS"),
            ("12", "LOCKED_MARKET_WARNING"),
            ("13", "CROSS_MARKET_WARNING"),
            ("14", "CANCELED_DUE_TO_LOCK_MARKET"),
            ("15", "CANCELED_DUE_TO_CROSS_MARKET"),
            ("16", "ACTIVE"),
            ("17", "CANCELED"),
        ]),
        tag::QUOTE_REJECT_REASON => def.with_values([
            ("1", "UNKNOWN_SYMBOL"),
            ("2", "EXCHANGE_CLOSED"),
            ("3", "QUOTE_REQUEST_EXCEEDS_LIMIT"),
            ("4", "TOO_LATE_TO_ENTER"),
            ("5", "UNKNOWN_QUOTE"),
            ("6", "DUPLICATE_QUOTE"),
            ("7", "INVALID_BID_ASK_SPREAD"),
            ("8", "INVALID_PRICE"),
            ("9", "NOT_AUTHORIZED_TO_QUOTE_SECURITY"),
            ("99", "OTHER"),
        ]),
        _ => def,
    }
}

fn session_messages() -> Vec<MessageDef> {
    use MessageCategory::Admin;
    vec![
        MessageDef::new("0", "Heartbeat", Admin).with_field(112, "TestReqID", false),
        MessageDef::new("1", "TestRequest", Admin).with_field(112, "TestReqID", true),
        MessageDef::new("2", "ResendRequest", Admin)
            .with_field(7, "BeginSeqNo", true)
            .with_field(16, "EndSeqNo", true),
        MessageDef::new("3", "Reject", Admin)
            .with_field(45, "RefSeqNum", true)
            .with_field(371, "RefTagID", false)
            .with_field(372, "RefMsgType", false)
            .with_field(373, "SessionRejectReason", false)
            .with_field(tag::TEXT, "Text", false),
        MessageDef::new("4", "SequenceReset", Admin)
            .with_field(123, "GapFillFlag", false)
            .with_field(36, "NewSeqNo", true),
        MessageDef::new("5", "Logout", Admin).with_field(tag::TEXT, "Text", false),
        MessageDef::new("A", "Logon", Admin)
            .with_field(98, "EncryptMethod", true)
            .with_field(108, "HeartBtInt", true)
            .with_field(141, "ResetSeqNumFlag", false),
        MessageDef::new("j", "BusinessMessageReject", MessageCategory::App)
            .with_field(45, "RefSeqNum", false)
            .with_field(372, "RefMsgType", true)
            .with_field(380, "BusinessRejectReason", true)
            .with_field(tag::TEXT, "Text", false),
    ]
}

fn quote_messages() -> Vec<MessageDef> {
    use MessageCategory::App;
    vec![
        MessageDef::new("AG", "QuoteRequestReject", App)
            .with_field(tag::QUOTE_REQ_ID, "QuoteReqID", true)
            .with_field(tag::QUOTE_REQUEST_REJECT_REASON, "QuoteRequestRejectReason", true)
            .with_group(
                GroupDef::new(tag::NO_RELATED_SYM, "NoRelatedSym", false)
                    .with_field(tag::SYMBOL, "Symbol", true)
                    .with_field(tag::PRICE, "Price", false)
                    .with_field(tag::ORDER_QTY, "OrderQty", false),
            ),
        MessageDef::new("AH", "RFQRequest", App).with_field(tag::RFQ_REQ_ID, "RFQReqID", true),
        MessageDef::new("AI", "QuoteStatusReport", App)
            .with_field(tag::ORDER_QTY, "OrderQty", true)
            .with_field(tag::SIDE, "Side", false)
            .with_field(tag::SYMBOL, "Symbol", true)
            .with_field(tag::VALID_UNTIL_TIME, "ValidUntilTime", true)
            .with_field(tag::QUOTE_ID, "QuoteID", false)
            .with_field(tag::EXPIRE_TIME, "ExpireTime", true)
            .with_field(tag::QUOTE_REQ_ID, "QuoteReqID", true)
            .with_field(tag::BID_PX, "BidPx", false)
            .with_field(tag::OFFER_PX, "OfferPx", false)
            .with_field(tag::QUOTE_STATUS, "QuoteStatus", true)
            .with_field(tag::QUOTE_REJECT_REASON, "QuoteRejectReason", false),
        MessageDef::new("AJ", "QuoteResponse", App)
            .with_field(tag::SIDE, "Side", true)
            .with_field(tag::SYMBOL, "Symbol", true)
            .with_field(tag::QUOTE_RESP_ID, "QuoteRespID", true)
            .with_field(tag::QUOTE_RESP_TYPE, "QuoteRespType", true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{QuoteRequestRejectReason, QuoteRespType, QuoteStatus};
    use crate::quoterequestreject::{NoRelatedSymRepeatingGroup, QuoteRequestReject};
    use crate::quoteresponse::QuoteResponse;
    use crate::quotestatusreport::QuoteStatusReport;
    use crate::rfqrequest::RfqRequest;
    use rfqfix_core::error::RejectReason;
    use rfqfix_core::types::{Side, Timestamp};
    use rfqfix_tagvalue::{FixMessage, Message};
    use rust_decimal::Decimal;

    fn stamped(mut message: Message) -> Message {
        message.header.set_str(tag::SENDER_COMP_ID, "BANK");
        message.header.set_str(tag::TARGET_COMP_ID, "CLIENT");
        message.header.set_str(tag::MSG_SEQ_NUM, "7");
        message.header.set_str(tag::SENDING_TIME, "20260127-10:15:30.000");
        let bytes = message.build().unwrap();
        Message::parse(&bytes).unwrap()
    }

    #[test]
    fn test_dictionary_contents() {
        let dict = dictionary();
        assert_eq!(dict.version, Version::Fix42);
        for msg_type in ["0", "1", "2", "3", "4", "5", "A", "j", "AG", "AH", "AI", "AJ"] {
            assert!(dict.get_message(msg_type).is_some(), "missing {msg_type}");
        }
        assert_eq!(dict.get_field_by_name("RFQReqID").map(|f| f.tag), Some(644));
        assert_eq!(dict.header.len(), 27);
        assert_eq!(dict.trailer.len(), 3);
    }

    #[test]
    fn test_generated_messages_validate() {
        let dict = dictionary();

        let mut reject = QuoteRequestReject::new("QR-1", QuoteRequestRejectReason::NoInventory);
        let mut group = NoRelatedSymRepeatingGroup::new();
        let entry = group.add();
        entry.set_symbol("EUR/USD");
        entry.set_order_qty(Decimal::new(1_000_000, 0), 0);
        reject.set_no_related_sym(&group);

        let status = QuoteStatusReport::new(
            "QR-1",
            "EUR/USD",
            Decimal::new(1_000_000, 0),
            0,
            Timestamp::parse_fix("20260127-10:15:30").unwrap(),
            Timestamp::parse_fix("20260127-10:20:30").unwrap(),
            QuoteStatus::Active,
        );

        let messages = [
            reject.to_message(),
            RfqRequest::new("RFQ-1").to_message(),
            status.to_message(),
            QuoteResponse::new("QRSP-1", QuoteRespType::HitLift, Side::Buy, "EUR/USD")
                .to_message(),
        ];
        for message in messages {
            let message = stamped(message);
            assert_eq!(dict.validate(&message), Ok(()), "{message}");
        }
    }

    #[test]
    fn test_validation_failures() {
        let dict = dictionary();

        let missing = stamped(Message::with_type("FIX.4.2", "AH"));
        let err = dict.validate(&missing).unwrap_err();
        assert_eq!(err.reason(), RejectReason::RequiredTagMissing);
        assert_eq!(err.ref_tag(), Some(tag::RFQ_REQ_ID));

        let mut bad_value = RfqRequest::new("RFQ-1").to_message();
        bad_value.body.set_str(tag::QUOTE_RESP_TYPE, "1");
        let err = dict.validate(&stamped(bad_value)).unwrap_err();
        assert_eq!(err.reason(), RejectReason::TagNotDefinedForThisMessageType);

        let mut response =
            QuoteResponse::new("QRSP-2", QuoteRespType::Counter, Side::Sell, "EUR/USD");
        response.message_mut().body.set_str(tag::QUOTE_RESP_TYPE, "9");
        let err = dict.validate(&stamped(response.to_message())).unwrap_err();
        assert_eq!(err.reason(), RejectReason::ValueIsIncorrect);

        let unknown = stamped(Message::with_type("FIX.4.2", "D"));
        let err = dict.validate(&unknown).unwrap_err();
        assert_eq!(err.reason(), RejectReason::InvalidMsgType);
    }
}
