//! Checkout validation.
//!
//! Customer fields are checked in a fixed order (name, address, phone,
//! email, card number, expiry) and the first violation is returned. Cart
//! checks follow: the cart must be non-empty, and each item is checked for
//! quantity and then against the catalog book it references.
//!
//! Nothing here performs I/O. Looking up the catalog book for a cart item is
//! the caller's job; [`check_against_book`] only compares.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::types::{
    Book, CardExpiry, CustomerForm, Email, EmailError, ExpiryError, NewCustomer, ShoppingCart,
    ShoppingCartItem,
};

/// Minimum length of the name and address fields.
pub const MIN_TEXT_LENGTH: usize = 4;
/// Maximum length of the name and address fields.
pub const MAX_TEXT_LENGTH: usize = 45;
/// Digits in a phone number once punctuation is removed.
pub const PHONE_DIGITS: usize = 10;
/// Accepted card number lengths once spaces and dashes are removed.
pub const CC_NUMBER_LENGTH: core::ops::RangeInclusive<usize> = 14..=16;
/// Longest phone or card number accepted as entered, punctuation included.
pub const MAX_ENTERED_NUMBER_LENGTH: usize = 45;
/// Longest accepted email address.
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Accepted quantity per cart item.
pub const QUANTITY_RANGE: core::ops::RangeInclusive<i32> = 1..=99;

/// The input a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Address,
    Phone,
    Email,
    CcNumber,
    ExpiryDate,
    Cart,
    BookId,
    Quantity,
    Price,
    CategoryId,
}

impl Field {
    /// The wire name of the field, as used in error responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::CcNumber => "ccNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cart => "cart",
            Self::BookId => "bookId",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::CategoryId => "categoryId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking a single text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    Valid,
    Missing,
    Malformed,
}

/// What was wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Violation {
    /// Blank or absent.
    Missing,
    /// Present but not in an accepted format or length.
    Malformed,
    /// Card expiry month is in the past.
    Expired,
    /// Quantity outside the accepted range.
    OutOfRange,
    /// Cart snapshot disagrees with the catalog.
    Mismatch,
    /// Cart item references a book that does not exist.
    Unknown,
}

/// A checkout input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Field the failure refers to.
    pub field: Field,
    /// Kind of failure.
    pub violation: Violation,
    /// Message suitable for showing to the shopper.
    pub message: &'static str,
}

impl ValidationError {
    /// Create a validation error.
    #[must_use]
    pub const fn new(field: Field, violation: Violation, message: &'static str) -> Self {
        Self {
            field,
            violation,
            message,
        }
    }
}

// =============================================================================
// Field checks
// =============================================================================

fn check_text(value: &str) -> FieldCheck {
    if value.is_empty() {
        return FieldCheck::Missing;
    }
    let len = value.chars().count();
    if (MIN_TEXT_LENGTH..=MAX_TEXT_LENGTH).contains(&len) {
        FieldCheck::Valid
    } else {
        FieldCheck::Malformed
    }
}

/// Name: non-empty, 4 to 45 characters.
#[must_use]
pub fn check_name(name: &str) -> FieldCheck {
    check_text(name)
}

/// Address: non-empty, 4 to 45 characters.
#[must_use]
pub fn check_address(address: &str) -> FieldCheck {
    check_text(address)
}

/// Phone: non-empty, at most 45 characters as entered; exactly ten digits
/// once spaces, dashes and parentheses are removed.
#[must_use]
pub fn check_phone(phone: &str) -> FieldCheck {
    if phone.is_empty() {
        return FieldCheck::Missing;
    }
    if phone.chars().count() > MAX_ENTERED_NUMBER_LENGTH {
        return FieldCheck::Malformed;
    }
    let digits: Vec<char> = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if digits.len() == PHONE_DIGITS && digits.iter().all(char::is_ascii_digit) {
        FieldCheck::Valid
    } else {
        FieldCheck::Malformed
    }
}

/// Email: see [`Email::parse`]; at most 254 characters.
#[must_use]
pub fn check_email(email: &str) -> FieldCheck {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return FieldCheck::Malformed;
    }
    match Email::parse(email) {
        Ok(_) => FieldCheck::Valid,
        Err(EmailError::Empty) => FieldCheck::Missing,
        Err(_) => FieldCheck::Malformed,
    }
}

/// Card number: 14 to 16 characters once whitespace and dashes are removed,
/// at most 45 as entered.
#[must_use]
pub fn check_cc_number(cc_number: &str) -> FieldCheck {
    if cc_number.is_empty() {
        return FieldCheck::Missing;
    }
    if cc_number.chars().count() > MAX_ENTERED_NUMBER_LENGTH {
        return FieldCheck::Malformed;
    }
    let len = cc_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .count();
    if CC_NUMBER_LENGTH.contains(&len) {
        FieldCheck::Valid
    } else {
        FieldCheck::Malformed
    }
}

fn require(
    check: FieldCheck,
    field: Field,
    missing: &'static str,
    malformed: &'static str,
) -> Result<(), ValidationError> {
    match check {
        FieldCheck::Valid => Ok(()),
        FieldCheck::Missing => Err(ValidationError::new(field, Violation::Missing, missing)),
        FieldCheck::Malformed => Err(ValidationError::new(field, Violation::Malformed, malformed)),
    }
}

/// Parse the card expiry and reject months before `today`'s month.
///
/// # Errors
///
/// Returns a [`Field::ExpiryDate`] error with [`Violation::Expired`] for a
/// past month, or [`Violation::Malformed`] for a blank or unparsable one.
pub fn check_expiry(month: &str, year: &str, today: NaiveDate) -> Result<CardExpiry, ValidationError> {
    let expiry = CardExpiry::parse(month, year).map_err(|e| match e {
        ExpiryError::Empty | ExpiryError::Malformed => ValidationError::new(
            Field::ExpiryDate,
            Violation::Malformed,
            "Please enter a valid expiration format.",
        ),
    })?;

    if expiry.is_expired_on(today) {
        return Err(ValidationError::new(
            Field::ExpiryDate,
            Violation::Expired,
            "Please enter a valid expiration date.",
        ));
    }

    Ok(expiry)
}

/// Validate every customer field, in order, and build the row to insert.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_customer_form(
    form: &CustomerForm,
    today: NaiveDate,
) -> Result<NewCustomer, ValidationError> {
    require(
        check_name(&form.name),
        Field::Name,
        "Missing name field.",
        "Invalid name field.",
    )?;
    require(
        check_address(&form.address),
        Field::Address,
        "Missing address field.",
        "Invalid address field.",
    )?;
    require(
        check_phone(&form.phone),
        Field::Phone,
        "Missing phone field.",
        "Invalid phone field.",
    )?;
    require(
        check_email(&form.email),
        Field::Email,
        "Missing email field.",
        "Invalid email field.",
    )?;
    require(
        check_cc_number(&form.cc_number),
        Field::CcNumber,
        "Missing credit card number field.",
        "Invalid credit card number field.",
    )?;
    let expiry = check_expiry(&form.cc_expiry_month, &form.cc_expiry_year, today)?;

    let email = Email::parse(&form.email).map_err(|_| {
        ValidationError::new(Field::Email, Violation::Malformed, "Invalid email field.")
    })?;

    Ok(NewCustomer {
        name: form.name.clone(),
        address: form.address.clone(),
        phone: form.phone.clone(),
        email,
        cc_number: form.cc_number.clone(),
        cc_expiry: expiry.ends_at(),
    })
}

// =============================================================================
// Cart checks
// =============================================================================

/// The cart must contain at least one item.
///
/// # Errors
///
/// Returns a [`Field::Cart`] error if the cart is empty.
pub fn check_cart_not_empty(cart: &ShoppingCart) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::new(
            Field::Cart,
            Violation::Missing,
            "Cart is empty.",
        ));
    }
    Ok(())
}

/// Quantity must be between 1 and 99.
///
/// # Errors
///
/// Returns a [`Field::Quantity`] error when out of range.
pub fn check_quantity(item: &ShoppingCartItem) -> Result<(), ValidationError> {
    if QUANTITY_RANGE.contains(&item.quantity) {
        Ok(())
    } else {
        Err(ValidationError::new(
            Field::Quantity,
            Violation::OutOfRange,
            "Invalid quantity.",
        ))
    }
}

/// Compare a cart item's snapshot with the catalog book it references.
///
/// `book` is `None` when the lookup found nothing.
///
/// # Errors
///
/// Returns [`Field::BookId`] for an unknown book, then [`Field::Price`] and
/// [`Field::CategoryId`] for stale snapshot values.
pub fn check_against_book(
    item: &ShoppingCartItem,
    book: Option<&Book>,
) -> Result<(), ValidationError> {
    let Some(book) = book else {
        return Err(ValidationError::new(
            Field::BookId,
            Violation::Unknown,
            "Book does not exist.",
        ));
    };

    if item.book.price != book.price {
        return Err(ValidationError::new(
            Field::Price,
            Violation::Mismatch,
            "Book price does not match.",
        ));
    }

    if item.book.category_id != book.category_id {
        return Err(ValidationError::new(
            Field::CategoryId,
            Violation::Mismatch,
            "Book category does not match.",
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BookForm, BookId, CategoryId, Money};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn valid_form() -> CustomerForm {
        CustomerForm {
            name: "Jane Doe".to_owned(),
            address: "123 Main St".to_owned(),
            phone: "(555) 123-4567".to_owned(),
            email: "jane@example.com".to_owned(),
            cc_number: "4111-1111-1111-1111".to_owned(),
            cc_expiry_month: "12".to_owned(),
            cc_expiry_year: "2099".to_owned(),
        }
    }

    fn rejected(form: &CustomerForm) -> (Field, Violation) {
        let err = validate_customer_form(form, today()).unwrap_err();
        (err.field, err.violation)
    }

    fn book(cents: i64, category: i64) -> Book {
        Book {
            id: BookId::new(7),
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            price: Money::from_cents(cents),
            is_public: true,
            is_featured: false,
            category_id: CategoryId::new(category),
        }
    }

    fn item(quantity: i32, cents: i64, category: i64) -> ShoppingCartItem {
        ShoppingCartItem {
            book_id: BookId::new(7),
            quantity,
            book: BookForm {
                book_id: BookId::new(7),
                price: Money::from_cents(cents),
                category_id: CategoryId::new(category),
            },
        }
    }

    #[test]
    fn test_valid_form_builds_customer() {
        let customer = validate_customer_form(&valid_form(), today()).unwrap();
        assert_eq!(customer.name, "Jane Doe");
        assert_eq!(customer.email.as_str(), "jane@example.com");
        assert_eq!(customer.cc_number, "4111-1111-1111-1111");
        assert_eq!(
            customer.cc_expiry,
            NaiveDate::from_ymd_opt(2099, 12, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap()
                .and_utc()
        );
    }

    #[test]
    fn test_name_bounds() {
        let mut form = valid_form();
        form.name = "Jan".to_owned();
        assert_eq!(rejected(&form), (Field::Name, Violation::Malformed));

        form.name = "x".repeat(46);
        assert_eq!(rejected(&form), (Field::Name, Violation::Malformed));

        form.name = String::new();
        assert_eq!(rejected(&form), (Field::Name, Violation::Missing));

        form.name = "Jane".to_owned();
        assert!(validate_customer_form(&form, today()).is_ok());
        form.name = "x".repeat(45);
        assert!(validate_customer_form(&form, today()).is_ok());
    }

    #[test]
    fn test_address_bounds() {
        let mut form = valid_form();
        form.address = "1 A".to_owned();
        assert_eq!(rejected(&form), (Field::Address, Violation::Malformed));

        form.address = String::new();
        assert_eq!(rejected(&form), (Field::Address, Violation::Missing));
    }

    #[test]
    fn test_phone() {
        assert_eq!(check_phone("(555) 123-4567"), FieldCheck::Valid);
        assert_eq!(check_phone("5551234567"), FieldCheck::Valid);
        assert_eq!(check_phone(""), FieldCheck::Missing);
        assert_eq!(check_phone("555-123-456"), FieldCheck::Malformed);
        assert_eq!(check_phone("555-123-45678"), FieldCheck::Malformed);
        assert_eq!(check_phone("555.123.4567"), FieldCheck::Malformed);

        let mut form = valid_form();
        form.phone = "555 123 456".to_owned();
        assert_eq!(rejected(&form), (Field::Phone, Violation::Malformed));
        form.phone = String::new();
        assert_eq!(rejected(&form), (Field::Phone, Violation::Missing));
    }

    #[test]
    fn test_email() {
        let mut form = valid_form();
        form.email = String::new();
        assert_eq!(rejected(&form), (Field::Email, Violation::Missing));

        for bad in ["jane.example.com", "jane @example.com", "jane@example."] {
            form.email = bad.to_owned();
            assert_eq!(rejected(&form), (Field::Email, Violation::Malformed), "{bad}");
        }
    }

    #[test]
    fn test_cc_number_length() {
        assert_eq!(check_cc_number("4111 1111 1111 11"), FieldCheck::Valid);
        assert_eq!(check_cc_number("4111-1111-1111-1111"), FieldCheck::Valid);
        assert_eq!(check_cc_number("4111-1111-1111-1"), FieldCheck::Malformed);
        assert_eq!(check_cc_number("4111-1111-1111-11111"), FieldCheck::Malformed);

        let mut form = valid_form();
        form.cc_number = "4111 1111 1111 1".to_owned();
        assert_eq!(rejected(&form), (Field::CcNumber, Violation::Malformed));
    }

    #[test]
    fn test_padded_numbers_longer_than_stored_columns() {
        let padded_phone = format!("(555) 123-4567{}", " ".repeat(50));
        assert_eq!(padded_phone.chars().count(), 64);
        assert_eq!(check_phone(&padded_phone), FieldCheck::Malformed);

        let mut form = valid_form();
        form.phone = padded_phone;
        assert_eq!(rejected(&form), (Field::Phone, Violation::Malformed));

        let at_limit = format!("5551234567{}", "-".repeat(35));
        assert_eq!(at_limit.chars().count(), MAX_ENTERED_NUMBER_LENGTH);
        assert_eq!(check_phone(&at_limit), FieldCheck::Valid);

        let padded_card = format!("4111 1111 1111 1111{}", " ".repeat(40));
        assert_eq!(padded_card.chars().count(), 59);
        let mut form = valid_form();
        form.cc_number = padded_card;
        assert_eq!(rejected(&form), (Field::CcNumber, Violation::Malformed));

        let at_limit = format!("4111-1111-1111-1111{}", " ".repeat(26));
        assert_eq!(check_cc_number(&at_limit), FieldCheck::Valid);
    }

    #[test]
    fn test_email_longer_than_stored_column() {
        let long = format!("{}@example.com", "j".repeat(300));
        assert_eq!(long.chars().count(), 312);
        let mut form = valid_form();
        form.email = long;
        assert_eq!(rejected(&form), (Field::Email, Violation::Malformed));

        let at_limit = format!("{}@example.com", "j".repeat(MAX_EMAIL_LENGTH - 12));
        assert_eq!(check_email(&at_limit), FieldCheck::Valid);
    }

    #[test]
    fn test_expiry_last_month_is_expired() {
        let mut form = valid_form();
        form.cc_expiry_month = "9".to_owned();
        form.cc_expiry_year = "2026".to_owned();
        assert_eq!(rejected(&form), (Field::ExpiryDate, Violation::Expired));

        form.cc_expiry_month = "10".to_owned();
        assert!(validate_customer_form(&form, today()).is_ok());
    }

    #[test]
    fn test_expiry_malformed() {
        let mut form = valid_form();
        form.cc_expiry_month = String::new();
        assert_eq!(rejected(&form), (Field::ExpiryDate, Violation::Malformed));

        form.cc_expiry_month = "13".to_owned();
        assert_eq!(rejected(&form), (Field::ExpiryDate, Violation::Malformed));
    }

    #[test]
    fn test_fields_checked_in_order() {
        let form = CustomerForm::default();
        assert_eq!(rejected(&form), (Field::Name, Violation::Missing));

        let mut form = valid_form();
        form.phone = "1".to_owned();
        form.email = "bad".to_owned();
        assert_eq!(rejected(&form).0, Field::Phone);
    }

    #[test]
    fn test_cart_not_empty() {
        let empty = ShoppingCart::new(Vec::new(), Money::from_cents(500));
        let err = check_cart_not_empty(&empty).unwrap_err();
        assert_eq!(err.field, Field::Cart);

        let cart = ShoppingCart::new(vec![item(1, 1299, 1)], Money::ZERO);
        assert!(check_cart_not_empty(&cart).is_ok());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(check_quantity(&item(1, 1299, 1)).is_ok());
        assert!(check_quantity(&item(99, 1299, 1)).is_ok());
        assert_eq!(check_quantity(&item(0, 1299, 1)).unwrap_err().field, Field::Quantity);
        assert_eq!(check_quantity(&item(100, 1299, 1)).unwrap_err().field, Field::Quantity);
        assert_eq!(check_quantity(&item(-3, 1299, 1)).unwrap_err().field, Field::Quantity);
    }

    #[test]
    fn test_against_book() {
        let catalog = book(1299, 2);
        assert!(check_against_book(&item(2, 1299, 2), Some(&catalog)).is_ok());

        let err = check_against_book(&item(2, 1199, 2), Some(&catalog)).unwrap_err();
        assert_eq!((err.field, err.violation), (Field::Price, Violation::Mismatch));

        let err = check_against_book(&item(2, 1299, 3), Some(&catalog)).unwrap_err();
        assert_eq!((err.field, err.violation), (Field::CategoryId, Violation::Mismatch));

        let err = check_against_book(&item(2, 1299, 2), None).unwrap_err();
        assert_eq!((err.field, err.violation), (Field::BookId, Violation::Unknown));
    }

    #[test]
    fn test_field_wire_names() {
        assert_eq!(Field::CcNumber.to_string(), "ccNumber");
        assert_eq!(serde_json::to_string(&Field::ExpiryDate).unwrap(), "\"expiryDate\"");
    }
}
