/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # rfqfix Derive
//!
//! Procedural macros for the rfqfix FIX engine.
//!
//! ## Macros
//!
//! - `#[derive(FixField)]` - Implements `rfqfix_core::FixField` for a marker
//!   type by delegating to the `FieldCodec` of its value type
//! - `#[derive(FixMessage)]` - Implements `rfqfix_tagvalue::FixMessage` for a
//!   struct wrapping a `Message` in a field named `message`

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitInt, LitStr, Type, parse_macro_input};

/// Derives the `FixField` trait for a marker type.
///
/// # Attributes
///
/// - `#[fix(tag = N)]` - The field tag number
/// - `#[fix(value = "Type")]` - The value type; must implement `FieldCodec`
///
/// # Example
///
/// ```ignore
/// #[derive(FixField)]
/// #[fix(tag = 131, value = "String")]
/// pub struct QuoteReqId;
/// ```
#[proc_macro_derive(FixField, attributes(fix))]
pub fn derive_fix_field(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_fix_field(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives the `FixMessage` trait for a typed message wrapper.
///
/// # Attributes
///
/// - `#[fix(begin_string = "FIX.4.2")]` - BeginString (tag 8) of the message
/// - `#[fix(msg_type = "AG")]` - MsgType (tag 35) of the message
///
/// # Example
///
/// ```ignore
/// #[derive(FixMessage)]
/// #[fix(begin_string = "FIX.4.2", msg_type = "AH")]
/// pub struct RfqRequest {
///     message: Message,
/// }
/// ```
#[proc_macro_derive(FixMessage, attributes(fix))]
pub fn derive_fix_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_fix_message(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_fix_field(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let mut tag: Option<u32> = None;
    let mut value: Option<Type> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("fix")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let lit: LitInt = meta.value()?.parse()?;
                tag = Some(lit.base10_parse()?);
                Ok(())
            } else if meta.path.is_ident("value") {
                let lit: LitStr = meta.value()?.parse()?;
                value = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `tag` or `value`"))
            }
        })?;
    }

    let tag = tag.ok_or_else(|| syn::Error::new_spanned(name, "missing #[fix(tag = N)]"))?;
    let value = value
        .ok_or_else(|| syn::Error::new_spanned(name, "missing #[fix(value = \"Type\")]"))?;

    Ok(quote! {
        impl ::rfqfix_core::field::FixField for #name {
            const TAG: u32 = #tag;
            type Value = #value;

            fn decode(bytes: &[u8]) -> ::core::result::Result<Self::Value, ::rfqfix_core::error::DecodeError> {
                <#value as ::rfqfix_core::field::FieldCodec>::decode_value(#tag, bytes)
            }

            fn encode(value: &Self::Value, buf: &mut ::std::vec::Vec<u8>) {
                <#value as ::rfqfix_core::field::FieldCodec>::encode_value(value, buf)
            }
        }
    })
}

fn expand_fix_message(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let mut begin_string: Option<LitStr> = None;
    let mut msg_type: Option<LitStr> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("fix")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("begin_string") {
                begin_string = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("msg_type") {
                msg_type = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `begin_string` or `msg_type`"))
            }
        })?;
    }

    let begin_string = begin_string
        .ok_or_else(|| syn::Error::new_spanned(name, "missing #[fix(begin_string = \"...\")]"))?;
    let msg_type =
        msg_type.ok_or_else(|| syn::Error::new_spanned(name, "missing #[fix(msg_type = \"...\")]"))?;

    let has_message_field = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .any(|f| f.ident.as_ref().is_some_and(|i| i == "message")),
            _ => false,
        },
        _ => false,
    };
    if !has_message_field {
        return Err(syn::Error::new_spanned(
            name,
            "FixMessage can only be derived for structs with a `message: Message` field",
        ));
    }

    Ok(quote! {
        impl ::rfqfix_tagvalue::FixMessage for #name {
            const BEGIN_STRING: &'static str = #begin_string;
            const MSG_TYPE: &'static str = #msg_type;

            fn from_message(message: ::rfqfix_tagvalue::Message) -> Self {
                Self { message }
            }

            fn to_message(self) -> ::rfqfix_tagvalue::Message {
                self.message
            }

            fn message(&self) -> &::rfqfix_tagvalue::Message {
                &self.message
            }

            fn message_mut(&mut self) -> &mut ::rfqfix_tagvalue::Message {
                &mut self.message
            }
        }

        impl ::core::convert::From<::rfqfix_tagvalue::Message> for #name {
            fn from(message: ::rfqfix_tagvalue::Message) -> Self {
                Self { message }
            }
        }

        impl ::core::convert::From<#name> for ::rfqfix_tagvalue::Message {
            fn from(value: #name) -> Self {
                value.message
            }
        }
    })
}
