/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX 4.2 tag numbers used by the quote workflow.

/// BeginString.
pub const BEGIN_STRING: u32 = 8;
/// BodyLength.
pub const BODY_LENGTH: u32 = 9;
/// CheckSum.
pub const CHECK_SUM: u32 = 10;
/// MsgSeqNum.
pub const MSG_SEQ_NUM: u32 = 34;
/// MsgType.
pub const MSG_TYPE: u32 = 35;
/// OrderQty.
pub const ORDER_QTY: u32 = 38;
/// PossDupFlag.
pub const POSS_DUP_FLAG: u32 = 43;
/// Price.
pub const PRICE: u32 = 44;
/// SenderCompID.
pub const SENDER_COMP_ID: u32 = 49;
/// SenderSubID.
pub const SENDER_SUB_ID: u32 = 50;
/// SendingTime.
pub const SENDING_TIME: u32 = 52;
/// Side.
pub const SIDE: u32 = 54;
/// Symbol.
pub const SYMBOL: u32 = 55;
/// TargetCompID.
pub const TARGET_COMP_ID: u32 = 56;
/// TargetSubID.
pub const TARGET_SUB_ID: u32 = 57;
/// Text.
pub const TEXT: u32 = 58;
/// ValidUntilTime.
pub const VALID_UNTIL_TIME: u32 = 62;
/// PossResend.
pub const POSS_RESEND: u32 = 97;
/// SecureDataLen.
pub const SECURE_DATA_LEN: u32 = 90;
/// SecureData.
pub const SECURE_DATA: u32 = 91;
/// SignatureLength.
pub const SIGNATURE_LENGTH: u32 = 93;
/// Signature.
pub const SIGNATURE: u32 = 89;
/// OnBehalfOfCompID.
pub const ON_BEHALF_OF_COMP_ID: u32 = 115;
/// OnBehalfOfSubID.
pub const ON_BEHALF_OF_SUB_ID: u32 = 116;
/// QuoteID.
pub const QUOTE_ID: u32 = 117;
/// OrigSendingTime.
pub const ORIG_SENDING_TIME: u32 = 122;
/// ExpireTime.
pub const EXPIRE_TIME: u32 = 126;
/// DeliverToCompID.
pub const DELIVER_TO_COMP_ID: u32 = 128;
/// DeliverToSubID.
pub const DELIVER_TO_SUB_ID: u32 = 129;
/// QuoteReqID.
pub const QUOTE_REQ_ID: u32 = 131;
/// BidPx.
pub const BID_PX: u32 = 132;
/// OfferPx.
pub const OFFER_PX: u32 = 133;
/// SenderLocationID.
pub const SENDER_LOCATION_ID: u32 = 142;
/// TargetLocationID.
pub const TARGET_LOCATION_ID: u32 = 143;
/// OnBehalfOfLocationID.
pub const ON_BEHALF_OF_LOCATION_ID: u32 = 144;
/// DeliverToLocationID.
pub const DELIVER_TO_LOCATION_ID: u32 = 145;
/// NoRelatedSym.
pub const NO_RELATED_SYM: u32 = 146;
/// XmlDataLen.
pub const XML_DATA_LEN: u32 = 212;
/// XmlData.
pub const XML_DATA: u32 = 213;
/// QuoteStatus.
pub const QUOTE_STATUS: u32 = 297;
/// QuoteRejectReason.
pub const QUOTE_REJECT_REASON: u32 = 300;
/// MessageEncoding.
pub const MESSAGE_ENCODING: u32 = 347;
/// LastMsgSeqNumProcessed.
pub const LAST_MSG_SEQ_NUM_PROCESSED: u32 = 369;
/// OnBehalfOfSendingTime.
pub const ON_BEHALF_OF_SENDING_TIME: u32 = 370;
/// RFQReqID.
pub const RFQ_REQ_ID: u32 = 644;
/// QuoteRequestRejectReason.
pub const QUOTE_REQUEST_REJECT_REASON: u32 = 658;
/// QuoteRespID.
pub const QUOTE_RESP_ID: u32 = 693;
/// QuoteRespType.
pub const QUOTE_RESP_TYPE: u32 = 694;
