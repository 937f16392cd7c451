//! Static character-set data.
//!
//! Standard sets follow the Google Fonts API naming where one exists;
//! the Chinese sets are frequency-ordered selections.

pub(crate) const DIGITS: &str = "0123456789";

pub(crate) const LATIN_BASIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub(crate) const PUNCTUATION_BASIC: &str = r#",.?!;:'"-()[]{}<>/\|`~@#$%^&*+=_"#;

pub(crate) const LATIN: &str = r#"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789.,;:!?'"\/|_-+=()<>[]{}#%^*~`@&$€£¥¢¤°©®™§¶†‡•…‰←↑→↓◊ÆæÐðØøÞþßÀÁÂÃÄÅÇÈÉÊËÌÍÎÏÑÒÓÔÕÖÙÚÛÜÝàáâãäåçèéêëìíîïñòóôõöùúûüýÿ"#;

pub(crate) const LATIN_EXT: &str = "ĀāĂăĄąĆćĈĉĊċČčĎďĐđĒēĔĕĖėĘęĚěĜĝĞğĠġĢģĤĥĦħĨĩĪīĬĭĮįİıĲĳĴĵĶķĸĹĺĻļĽľĿŀŁłŃńŅņŇňŉŊŋŌōŎŏŐőŒœŔŕŖŗŘřŚśŜŝŞşŠšŢţŤťŦŧŨũŪūŬŭŮůŰűŲųŴŵŶŷŸŹźŻżŽžſƒǰǺǻǼǽǾǿȘșȚțȷʼˆˇˉ˘˙˚˛˜˝ẀẁẂẃẄẅỲỳ";

pub(crate) const CYRILLIC: &str = "АБВГДЕЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯабвгдежзийклмнопрстуфхцчшщъыьэюяЁёЂђЃѓЄєЅѕІіЇїЈјЉљЊњЋћЌќЍѝЎўЏџҐґ";

pub(crate) const CYRILLIC_EXT: &str = "ҐґҒғҖҗҚқҢңҮүҰұҲҳҶҷӘәӨөӮӯ";

pub(crate) const GREEK: &str = "ΑΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩαβγδεζηθικλμνξοπρςστυφχψωάέήίόύώΆΈΉΊΌΎΏΐΰϊϋΪΫ";

pub(crate) const VIETNAMESE: &str = "ẠạẢảẤấẦầẨẩẪẫẬậẮắẰằẲẳẴẵẶặẸẹẺẻẼẽẾếỀềỂểỄễỆệỈỉỊịỌọỎỏỐốỒồỔổỖỗỘộỚớỜờỞởỠỡỢợỤụỦủỨứỪừỬửỮữỰựỲỳỴỵỶỷỸỹ";

pub(crate) const CHINESE_LEVEL1: &str = "一二三四五六七八九十百千万亿元年月日时分秒";

pub(crate) const CHINESE_COMMON: &str = "的一是在不了有和人这中大为上个国我以要他时来用们生到作地于出就分对成会可主发年动同工也能下过子说产种面而方后多定行学法所民得经十三之进着等部度家电力里如水化高自二理起小物现实加量都两体制机当使点从业本去把性好应开它合还因由其些然前外天政四日那社义事平";

pub(crate) const MATH: &str = "±×÷≠≈≤≥∑∏√∞∫∆∂∇∥∠∟∣∥∦∧∨∩∪∈∉⊂⊃⊆⊇⊕⊗⊥⋅⌈⌉⌊⌋";

pub(crate) const CURRENCY: &str = "¤$¢£¥€₽₨₩₪₫₭₮₯₱₲₳₴₵₸₹₺₼₽₾";

pub(crate) const ARROWS: &str = "←↑→↓↔↕↖↗↘↙⇐⇒⇔⇧⇩⇦⇨";
