#[macro_export]
macro_rules! models {
    (
        $( $model:ident ),*
    ) => {{
        let mut builder = keel::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}

/// Runs each scenario once per backend.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        mod sqlite {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    super::$f($crate::db::sqlite::SetupSqlite::new());
                }
            )*
        }

        mod json {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    super::$f($crate::db::json::SetupJson::new());
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}

/// Like `tests!`, for `async fn` scenarios run on a multi-threaded runtime.
#[macro_export]
macro_rules! async_tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        mod sqlite {
            $(
                #[tokio::test(flavor = "multi_thread")]
                $( #[$attrs] )*
                async fn $f() {
                    super::$f($crate::db::sqlite::SetupSqlite::new()).await;
                }
            )*
        }

        mod json {
            $(
                #[tokio::test(flavor = "multi_thread")]
                $( #[$attrs] )*
                async fn $f() {
                    super::$f($crate::db::json::SetupJson::new()).await;
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::async_tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
