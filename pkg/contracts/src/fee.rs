use pxe::{canonical::sponsored_fpc, FeePayment};

/// Fee payment sponsored by the canonical fee-payment contract
///
/// Every environment that submits transactions with this payment method must
/// have the FPC instance registered first.
#[must_use]
pub fn sponsored_fee() -> FeePayment {
    FeePayment::Sponsored {
        fpc: sponsored_fpc().address(),
    }
}
