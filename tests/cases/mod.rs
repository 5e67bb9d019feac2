/// Declares a test compiling `input` with the default pricer.
///
/// - `validated` checks the prefix form of the accepted payoff.
/// - `error` checks the error kind and diagnostic code of a rejected one.
#[macro_export]
macro_rules! test_case {
    {
        name: $name:ident,
        input: $input:expr,
        validated: { $expected:expr } $(,)?
    } => {
        #[test]
        fn $name() {
            let payoff = ::payoff::Pricer::default()
                .compile($input)
                .unwrap_or_else(|e| panic!("{:?} was rejected: {}", $input, e));
            ::pretty_assertions::assert_eq!(payoff.to_string(), $expected);
        }
    };
    {
        name: $name:ident,
        input: $input:expr,
        error: { $kind:expr, $code:expr } $(,)?
    } => {
        #[test]
        fn $name() {
            let err = match ::payoff::Pricer::default().compile($input) {
                Ok(payoff) => panic!("{:?} was accepted as {}", $input, payoff),
                Err(err) => err,
            };
            ::pretty_assertions::assert_eq!(err.kind(), $kind);
            let code = err.to_diagnostic().and_then(|d| d.code);
            ::pretty_assertions::assert_eq!(code.as_deref(), Some($code));
        }
    };
}
