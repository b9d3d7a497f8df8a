macro_rules! opcode_list {
    ( $( opcode $name:ident<$num:literal> )* ) => {
        #[allow(non_upper_case_globals)]
        pub mod codes {
            $(
                pub const $name: u8 = $num;
            )*

            pub const Op0: u8 = OpFalse;
            pub const Op1: u8 = OpTrue;
        }

        /// Returns the mnemonic of a defined opcode.
        pub fn opcode_name(opcode: u8) -> Option<&'static str> {
            match opcode {
                $(
                    $num => Some(stringify!($name)),
                )*
                _ => None,
            }
        }
    };
}
