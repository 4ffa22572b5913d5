//! Qualified names of platform types the generator reasons about.

pub const KOTLIN_ANY: &str = "kotlin.Any";
pub const KOTLIN_BOOLEAN: &str = "kotlin.Boolean";
pub const KOTLIN_BYTE: &str = "kotlin.Byte";
pub const KOTLIN_SHORT: &str = "kotlin.Short";
pub const KOTLIN_INT: &str = "kotlin.Int";
pub const KOTLIN_LONG: &str = "kotlin.Long";
pub const KOTLIN_FLOAT: &str = "kotlin.Float";
pub const KOTLIN_DOUBLE: &str = "kotlin.Double";
pub const KOTLIN_CHAR: &str = "kotlin.Char";
pub const KOTLIN_NUMBER: &str = "kotlin.Number";
pub const KOTLIN_STRING: &str = "kotlin.String";
pub const KOTLIN_CHAR_SEQUENCE: &str = "kotlin.CharSequence";
pub const KOTLIN_COMPARABLE: &str = "kotlin.Comparable";
pub const KOTLIN_CLONEABLE: &str = "kotlin.Cloneable";
pub const KOTLIN_ENUM: &str = "kotlin.Enum";
pub const KOTLIN_ARRAY: &str = "kotlin.Array";
pub const KOTLIN_ARRAY_LIST: &str = "kotlin.collections.ArrayList";
pub const KOTLIN_MUTABLE_LIST: &str = "kotlin.collections.MutableList";
pub const KOTLIN_LIST: &str = "kotlin.collections.List";

pub const JAVA_SERIALIZABLE: &str = "java.io.Serializable";
pub const JAVA_RANDOM_ACCESS: &str = "java.util.RandomAccess";

pub const ANDROID_PARCELABLE: &str = "android.os.Parcelable";
pub const ANDROID_BASE_BUNDLE: &str = "android.os.BaseBundle";
pub const ANDROID_BUNDLE: &str = "android.os.Bundle";
pub const ANDROID_IBINDER: &str = "android.os.IBinder";
pub const ANDROID_SIZE: &str = "android.util.Size";
pub const ANDROID_SIZE_F: &str = "android.util.SizeF";
pub const ANDROID_SPARSE_ARRAY: &str = "android.util.SparseArray";
pub const ANDROID_ACTIVITY: &str = "android.app.Activity";

pub const ANDROIDX_CORE_COMPONENT_ACTIVITY: &str = "androidx.core.app.ComponentActivity";
pub const ANDROIDX_COMPONENT_ACTIVITY: &str = "androidx.activity.ComponentActivity";
pub const ANDROIDX_FRAGMENT_ACTIVITY: &str = "androidx.fragment.app.FragmentActivity";
pub const ANDROIDX_APPCOMPAT_ACTIVITY: &str = "androidx.appcompat.app.AppCompatActivity";
pub const ANDROIDX_FRAGMENT: &str = "androidx.fragment.app.Fragment";

/// Simple names of the runtime types generated next to the saver.
pub const STATE_SAVER: &str = "StateSaver";
pub const EMPTY_STATE_SAVER: &str = "EmptyStateSaver";
pub const STATE_HOLDER: &str = "StateHolder";
pub const EMPTY_STATE_HOLDER: &str = "EmptyStateHolder";
pub const IDENTIFICATION_STRATEGY: &str = "FragmentIdentificationStrategy";
pub const STATE_SAVING_ACTIVITY: &str = "StateSavingActivity";
pub const STATE_SAVING_FRAGMENT: &str = "StateSavingFragment";
pub const GENERATED_STATE_SAVER: &str = "GeneratedStateSaver";
pub const GENERATED_STATE_HOLDER: &str = "GeneratedStateHolder";
